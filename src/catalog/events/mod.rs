//! # Events Module
//!
//! View events emitted by controllers, navigation targets, and the router
//! that turns paths into navigation contexts.

pub mod navigation;
pub mod route;
pub mod view_events;

pub use navigation::{NavigationContext, Router, ViewKind};
pub use route::{Route, CATALOG_ROOT};
pub use view_events::ViewEvent;
