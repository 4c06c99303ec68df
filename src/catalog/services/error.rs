//! # Gateway Errors
//!
//! Every failure coming out of the gateway is collapsed into one shape with
//! a human-readable message. The kind and status code ride along for logging
//! and tests; controllers only ever show the message.

use std::error::Error;
use std::fmt;

/// Result type returned by every gateway operation
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Origin of a gateway failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// No response was received (DNS, connection refused, invalid URL, ...)
    Transport,
    /// The server answered with a non-success status or an unreadable body
    Application,
}

/// Normalized "request failed" error
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    status: Option<u16>,
    message: String,
}

impl GatewayError {
    /// Build a transport failure from the underlying error, including its cause chain
    pub fn transport(error: &(dyn Error + 'static)) -> Self {
        let mut detail = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            detail.push_str(&format!("\n  Caused by: {cause}"));
            source = cause.source();
        }
        Self::transport_message(&detail)
    }

    /// Build a transport failure from plain text
    pub fn transport_message(detail: &str) -> Self {
        Self {
            kind: GatewayErrorKind::Transport,
            status: None,
            message: format!("Error: {detail}"),
        }
    }

    /// Build an application failure from a status code and reason phrase
    pub fn application(status: u16, reason: &str) -> Self {
        Self {
            kind: GatewayErrorKind::Application,
            status: Some(status),
            message: format!("Error Code: {status}\nMessage: {reason}"),
        }
    }

    pub fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    /// HTTP status, present for application failures only
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Normalized message shown to users
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the server reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request failed: {}", self.message)
    }
}

impl Error for GatewayError {}
