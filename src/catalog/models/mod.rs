//! # Models Module
//!
//! Wire types exchanged with the catalog backend.

pub mod endpoint;
pub mod interface;
pub mod server_info;

pub use endpoint::Endpoint;
pub use interface::{
    Interface, AUTH_TYPES, DEFAULT_AUTH_TYPE, DEFAULT_INTERFACE_TYPE, INTERFACE_TYPES,
};
pub use server_info::ServerInfo;
