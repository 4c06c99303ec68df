//! # Controllers Module
//!
//! View-state controllers for the catalog, plus the shell that hosts them.
//!
//! Every view controller follows the same lifecycle:
//!
//! ```text
//! new ──▶ activate ──▶ (user operations, poll / settle) ──▶ teardown
//! ```
//!
//! Requests started by a controller run in the background; their results are
//! only applied when the host drains them through [`ViewController::poll`] or
//! [`ViewController::settle`]. After [`ViewController::teardown`] nothing is
//! applied and no view event is emitted.

use crate::catalog::events::ViewEvent;
use async_trait::async_trait;

pub mod app_controller;
pub mod detail_controller;
pub mod endpoint_sublist_controller;
pub mod form_controller;
pub mod list_controller;

pub use app_controller::AppController;
pub use detail_controller::{DetailController, DetailState};
pub use endpoint_sublist_controller::{
    EndpointSublistController, SublistState, ENDPOINT_COLUMNS,
};
pub use form_controller::{
    FormController, FormField, FormMode, FormState, InterfaceForm, ValidationError,
};
pub use list_controller::{filter_interfaces, ListController, ListState};

/// Message shown inline by the detail view when the interface cannot be loaded
pub const DETAIL_LOAD_FAILED: &str = "Failed to load API interface";

/// Message shown inline by the detail view when the route carries no id
pub const DETAIL_MISSING_ID: &str = "No API ID provided";

/// Notification shown when a delete request fails
pub const DELETE_FAILED: &str = "Failed to delete API interface. Please try again.";

/// Notification shown when the form cannot load the interface it edits
pub const FORM_LOAD_FAILED: &str = "Failed to load API interface. Redirecting...";

/// Notification shown when saving the form fails
pub const FORM_SAVE_FAILED: &str = "Failed to save API interface. Please try again.";

/// Confirmation text for deleting the named interface
pub fn delete_confirmation(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"?")
}

/// Common lifecycle of the catalog view controllers
#[async_trait]
pub trait ViewController: Send {
    /// Apply every result that has already arrived, without waiting
    ///
    /// Returns whether anything was applied.
    fn poll(&mut self) -> bool;

    /// Wait for the next in-flight request and apply its result
    ///
    /// Returns `false` when nothing is in flight or after teardown.
    async fn process_next(&mut self) -> bool;

    /// Whether any request started by this controller is still outstanding
    fn is_busy(&self) -> bool;

    /// Apply results until nothing is in flight
    async fn settle(&mut self) {
        while self.process_next().await {}
    }

    /// Cancel in-flight requests and stop emitting events
    fn teardown(&mut self);

    fn is_torn_down(&self) -> bool;

    /// Collect and clear pending view events
    fn collect_pending_view_events(&mut self) -> Vec<ViewEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_confirmation_should_quote_the_name() {
        assert_eq!(
            delete_confirmation("Cat Facts"),
            "Are you sure you want to delete \"Cat Facts\"?"
        );
    }
}
