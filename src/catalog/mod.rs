//! # Catalog Module
//!
//! Data access and view state for the API interface catalog, layered the
//! same way as the rest of the crate:
//!
//! - **models**: wire types exchanged with the backend
//! - **services**: the gateway trait, its HTTP implementation, the request dispatcher
//! - **events**: view events, routes and the router
//! - **controllers**: list, detail, form and endpoint sublist, plus the shell
//! - **views**: plain-text rendering of controller state
//! - **io**: confirmation and command input seams

pub mod commands;
pub mod controllers;
pub mod events;
pub mod io;
pub mod models;
pub mod services;
pub mod testing;
pub mod views;

pub use commands::ShellCommand;
pub use controllers::{
    AppController, DetailController, EndpointSublistController, FormController, ListController,
    ViewController,
};
pub use events::{NavigationContext, Route, Router, ViewEvent, ViewKind};
pub use models::{Endpoint, Interface, ServerInfo};
pub use services::{CatalogGateway, GatewayError, GatewayErrorKind, HttpCatalogGateway};
