//! # Services Layer
//!
//! Everything that touches the network lives here. Controllers depend on the
//! [`CatalogGateway`] trait only, never on each other, and start requests
//! through a [`Dispatcher`] so teardown can cut them off.

pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod http;

pub use dispatch::Dispatcher;
pub use error::{GatewayError, GatewayErrorKind, GatewayResult};
pub use gateway::CatalogGateway;
pub use http::HttpCatalogGateway;
