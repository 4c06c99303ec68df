//! # Endpoint Sublist Controller
//!
//! Loads and exposes the endpoints of one interface. The interface id comes
//! from the hosting view, never from the route.

use super::ViewController;
use crate::catalog::events::ViewEvent;
use crate::catalog::models::Endpoint;
use crate::catalog::services::{CatalogGateway, Dispatcher, GatewayResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Columns shown for each endpoint, in display order
pub const ENDPOINT_COLUMNS: [&str; 4] = ["method", "path", "description", "status"];

/// State rendered by the endpoint table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SublistState {
    pub interface_id: Option<i64>,
    pub endpoints: Vec<Endpoint>,
    pub is_loading: bool,
}

/// Endpoint table embedded in another view
pub struct EndpointSublistController {
    gateway: Arc<dyn CatalogGateway>,
    state: SublistState,
    dispatcher: Dispatcher<GatewayResult<Vec<Endpoint>>>,
    pending_view_events: Vec<ViewEvent>,
}

impl EndpointSublistController {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gateway,
            state: SublistState::default(),
            dispatcher: Dispatcher::new(),
            pending_view_events: Vec::new(),
        }
    }

    /// Start loading endpoints for `interface_id`; does nothing without an id
    pub fn activate(&mut self, interface_id: Option<i64>) {
        self.state.interface_id = interface_id;
        let Some(id) = interface_id else {
            tracing::debug!("Endpoint sublist activated without an interface id");
            return;
        };

        self.state.is_loading = true;
        let gateway = self.gateway.clone();
        self.dispatcher
            .spawn("list endpoints", async move { gateway.list_endpoints(id).await });
    }

    pub fn state(&self) -> &SublistState {
        &self.state
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &ENDPOINT_COLUMNS
    }

    fn apply(&mut self, result: GatewayResult<Vec<Endpoint>>) {
        self.state.is_loading = false;
        match result {
            Ok(endpoints) => {
                tracing::debug!("Loaded {} endpoints", endpoints.len());
                self.state.endpoints = endpoints;
            }
            Err(error) => {
                tracing::warn!("Error loading endpoints: {}", error.message());
            }
        }
        self.emit_view_event(ViewEvent::StateChanged);
    }

    fn emit_view_event(&mut self, event: ViewEvent) {
        if self.dispatcher.is_cancelled() {
            return;
        }
        self.pending_view_events.push(event);
    }
}

#[async_trait]
impl ViewController for EndpointSublistController {
    fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Some(result) = self.dispatcher.try_next() {
            self.apply(result);
            applied = true;
        }
        applied
    }

    async fn process_next(&mut self) -> bool {
        match self.dispatcher.next().await {
            Some(result) => {
                self.apply(result);
                true
            }
            None => false,
        }
    }

    fn is_busy(&self) -> bool {
        self.dispatcher.in_flight() > 0
    }

    fn teardown(&mut self) {
        self.dispatcher.cancel();
        self.pending_view_events.clear();
    }

    fn is_torn_down(&self) -> bool {
        self.dispatcher.is_cancelled()
    }

    fn collect_pending_view_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.pending_view_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::Interface;
    use crate::catalog::services::GatewayError;
    use crate::catalog::testing::{Operation, StubGateway};

    fn stub_with_endpoints() -> Arc<StubGateway> {
        let stub = StubGateway::with_interfaces(vec![Interface::new("A", "REST", "https://a")]);
        stub.set_endpoints(
            1,
            vec![Endpoint::new(1, "GET", "/fact"), Endpoint::new(1, "POST", "/fact")],
        );
        Arc::new(stub)
    }

    #[tokio::test]
    async fn activate_without_id_should_not_load() {
        let stub = stub_with_endpoints();
        let mut controller = EndpointSublistController::new(stub.clone());

        controller.activate(None);
        controller.settle().await;

        assert!(stub.calls().is_empty());
        assert!(!controller.state().is_loading);
        assert!(controller.state().endpoints.is_empty());
    }

    #[tokio::test]
    async fn activate_should_load_endpoints_for_parent() {
        let stub = stub_with_endpoints();
        let mut controller = EndpointSublistController::new(stub.clone());

        controller.activate(Some(1));
        assert!(controller.state().is_loading);
        controller.settle().await;

        assert_eq!(controller.state().endpoints.len(), 2);
        assert!(!controller.state().is_loading);
        assert_eq!(
            controller.collect_pending_view_events(),
            vec![ViewEvent::StateChanged]
        );
    }

    #[tokio::test]
    async fn load_failure_should_leave_endpoints_empty() {
        let stub = stub_with_endpoints();
        stub.fail(
            Operation::ListEndpoints,
            GatewayError::application(500, "Internal Server Error"),
        );
        let mut controller = EndpointSublistController::new(stub.clone());

        controller.activate(Some(1));
        controller.settle().await;

        assert!(controller.state().endpoints.is_empty());
        assert!(!controller.state().is_loading);
    }

    #[test]
    fn columns_should_be_fixed() {
        let controller = EndpointSublistController::new(Arc::new(StubGateway::new()));
        assert_eq!(
            controller.columns(),
            &["method", "path", "description", "status"]
        );
    }

    #[tokio::test]
    async fn teardown_should_drop_late_endpoints() {
        let stub = stub_with_endpoints();
        let gate = stub.hold(Operation::ListEndpoints);
        let mut controller = EndpointSublistController::new(stub.clone());

        controller.activate(Some(1));
        tokio::task::yield_now().await;
        assert!(controller.is_busy());

        controller.teardown();
        gate.notify_one();
        tokio::task::yield_now().await;

        assert!(!controller.poll());
        controller.settle().await;
        assert!(!controller.is_busy());
        assert!(controller.state().endpoints.is_empty());
        assert!(controller.collect_pending_view_events().is_empty());
        assert_eq!(stub.call_count(Operation::ListEndpoints), 1);
    }
}
