//! # View Events
//!
//! Side effects a controller asks its host to perform. Controllers queue
//! them in order; the host drains the queue after each interaction.

use super::route::Route;

/// Events emitted by view controllers
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Controller state changed and should be redrawn
    StateChanged,

    /// Blocking notification the user has to acknowledge
    Notify { message: String },

    /// Leave the current view for another one
    Navigate(Route),
}

impl ViewEvent {
    /// Shorthand for a notification event
    pub fn notify(message: &str) -> Self {
        ViewEvent::Notify {
            message: message.to_string(),
        }
    }
}
