//! Testing infrastructure for catalog controllers
//!
//! An in-memory [`CatalogGateway`] that behaves like the backend (ids,
//! timestamps, 404s, duplicate names) and lets a test hold individual calls
//! in flight, inject failures, and inspect which operations were issued.

use crate::catalog::models::{Endpoint, Interface, ServerInfo};
use crate::catalog::services::{CatalogGateway, GatewayError, GatewayResult};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

/// Gateway operations, used to target failures and gates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListInterfaces,
    GetInterface,
    GetInterfaceByName,
    CreateInterface,
    UpdateInterface,
    DeleteInterface,
    ListEndpoints,
    ListLargeInterfaces,
    ServerInfo,
}

/// Endpoint count above which an interface counts as large
const LARGE_INTERFACE_THRESHOLD: usize = 5;

#[derive(Default)]
struct StubState {
    interfaces: BTreeMap<i64, Interface>,
    endpoints: HashMap<i64, Vec<Endpoint>>,
    next_id: i64,
    revision: u64,
    failures: HashMap<Operation, GatewayError>,
    gates: HashMap<Operation, VecDeque<Arc<Notify>>>,
    calls: Vec<Operation>,
}

impl StubState {
    fn timestamp(&mut self) -> String {
        self.revision += 1;
        format!(
            "2025-01-01T00:{:02}:{:02}",
            (self.revision / 60) % 60,
            self.revision % 60
        )
    }

    fn store(&mut self, mut interface: Interface) -> i64 {
        let id = match interface.id {
            Some(id) => id,
            None => {
                self.next_id += 1;
                self.next_id
            }
        };
        self.next_id = self.next_id.max(id);
        interface.id = Some(id);
        self.interfaces.insert(id, interface);
        id
    }

    fn find(&self, id: i64) -> GatewayResult<Interface> {
        self.interfaces
            .get(&id)
            .cloned()
            .ok_or_else(|| GatewayError::application(404, "Not Found"))
    }
}

/// In-memory gateway for tests
#[derive(Default)]
pub struct StubGateway {
    state: Mutex<StubState>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway preloaded with interfaces; missing ids are assigned in order
    pub fn with_interfaces(interfaces: Vec<Interface>) -> Self {
        let gateway = Self::new();
        for interface in interfaces {
            gateway.add_interface(interface);
        }
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, StubState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store an interface as if it had been created earlier, returning its id
    pub fn add_interface(&self, interface: Interface) -> i64 {
        self.lock().store(interface)
    }

    /// Replace the whole catalog content
    pub fn replace_interfaces(&self, interfaces: Vec<Interface>) {
        let mut state = self.lock();
        state.interfaces.clear();
        for interface in interfaces {
            state.store(interface);
        }
    }

    /// Set the endpoints returned for an interface
    pub fn set_endpoints(&self, interface_id: i64, endpoints: Vec<Endpoint>) {
        self.lock().endpoints.insert(interface_id, endpoints);
    }

    /// Current server-side copy of an interface
    pub fn stored(&self, id: i64) -> Option<Interface> {
        self.lock().interfaces.get(&id).cloned()
    }

    /// Number of stored interfaces
    pub fn len(&self) -> usize {
        self.lock().interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every future call of `operation` fail with `error`
    pub fn fail(&self, operation: Operation, error: GatewayError) {
        self.lock().failures.insert(operation, error);
    }

    /// Stop failing `operation`
    pub fn recover(&self, operation: Operation) {
        self.lock().failures.remove(&operation);
    }

    /// Hold the next call of `operation` until the returned gate is notified
    ///
    /// The call's outcome is computed when it is issued; only its delivery
    /// waits for the gate.
    pub fn hold(&self, operation: Operation) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock()
            .gates
            .entry(operation)
            .or_default()
            .push_back(gate.clone());
        gate
    }

    /// Every operation issued so far, in order
    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    /// How many times `operation` was issued
    pub fn call_count(&self, operation: Operation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    fn record<T>(
        &self,
        operation: Operation,
        handler: impl FnOnce(&mut StubState) -> GatewayResult<T>,
    ) -> (GatewayResult<T>, Option<Arc<Notify>>) {
        let mut state = self.lock();
        state.calls.push(operation);
        let gate = state
            .gates
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);
        let outcome = match state.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => handler(&mut state),
        };
        (outcome, gate)
    }

    async fn deliver<T>(
        &self,
        operation: Operation,
        handler: impl FnOnce(&mut StubState) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let (outcome, gate) = self.record(operation, handler);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        outcome
    }
}

#[async_trait]
impl CatalogGateway for StubGateway {
    async fn list_interfaces(&self) -> GatewayResult<Vec<Interface>> {
        self.deliver(Operation::ListInterfaces, |state| {
            Ok(state.interfaces.values().cloned().collect())
        })
        .await
    }

    async fn get_interface(&self, id: i64) -> GatewayResult<Interface> {
        self.deliver(Operation::GetInterface, |state| state.find(id))
            .await
    }

    async fn get_interface_by_name(&self, name: &str) -> GatewayResult<Interface> {
        self.deliver(Operation::GetInterfaceByName, |state| {
            state
                .interfaces
                .values()
                .find(|interface| interface.name.as_deref() == Some(name))
                .cloned()
                .ok_or_else(|| GatewayError::application(404, "Not Found"))
        })
        .await
    }

    async fn create_interface(&self, data: &Interface) -> GatewayResult<Interface> {
        self.deliver(Operation::CreateInterface, |state| {
            let duplicate = state
                .interfaces
                .values()
                .any(|existing| existing.name.is_some() && existing.name == data.name);
            if duplicate {
                return Err(GatewayError::application(400, "Bad Request"));
            }

            let mut created = data.clone();
            created.id = None;
            created.endpoints = None;
            let now = state.timestamp();
            created.created_at = Some(now.clone());
            created.updated_at = Some(now);
            let id = state.store(created);
            state.find(id)
        })
        .await
    }

    async fn update_interface(&self, id: i64, data: &Interface) -> GatewayResult<Interface> {
        self.deliver(Operation::UpdateInterface, |state| {
            let existing = state.find(id)?;
            let updated_at = state.timestamp();
            let updated = Interface {
                id: Some(id),
                created_at: existing.created_at,
                updated_at: Some(updated_at),
                endpoints: None,
                ..data.clone()
            };
            state.interfaces.insert(id, updated.clone());
            Ok(updated)
        })
        .await
    }

    async fn delete_interface(&self, id: i64) -> GatewayResult<()> {
        self.deliver(Operation::DeleteInterface, |state| {
            state.find(id)?;
            state.interfaces.remove(&id);
            state.endpoints.remove(&id);
            Ok(())
        })
        .await
    }

    async fn list_endpoints(&self, interface_id: i64) -> GatewayResult<Vec<Endpoint>> {
        self.deliver(Operation::ListEndpoints, |state| {
            Ok(state
                .endpoints
                .get(&interface_id)
                .cloned()
                .unwrap_or_default())
        })
        .await
    }

    async fn list_large_interfaces(&self) -> GatewayResult<Vec<Interface>> {
        self.deliver(Operation::ListLargeInterfaces, |state| {
            Ok(state
                .interfaces
                .values()
                .filter(|interface| {
                    interface.id.is_some_and(|id| {
                        state.endpoints.get(&id).map_or(0, Vec::len) > LARGE_INTERFACE_THRESHOLD
                    })
                })
                .cloned()
                .collect())
        })
        .await
    }

    async fn server_info(&self) -> GatewayResult<ServerInfo> {
        self.deliver(Operation::ServerInfo, |_| {
            Ok(ServerInfo {
                message: "Mini API Hub Backend API".to_string(),
                version: "1.0.0".to_string(),
                endpoints: [("apiInterfaces".to_string(), "/api/interfaces".to_string())]
                    .into_iter()
                    .collect(),
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_should_round_trip_content() {
        let gateway = StubGateway::new();
        let draft = Interface::new("Cat Facts", "REST", "https://catfact.ninja")
            .with_description("Random cat facts");

        let created = gateway.create_interface(&draft).await.unwrap();
        let id = created.id.unwrap();
        let fetched = gateway.get_interface(id).await.unwrap();

        assert!(draft.same_content(&fetched));
        assert!(fetched.created_at.is_some());
    }

    #[tokio::test]
    async fn repeated_identical_updates_should_converge() {
        let gateway = StubGateway::with_interfaces(vec![Interface::new("A", "REST", "https://a")]);
        let replacement = Interface::new("A", "SOAP", "https://a2").with_description("v2");

        let once = gateway.update_interface(1, &replacement).await.unwrap();
        let twice = gateway.update_interface(1, &replacement).await.unwrap();

        assert!(once.same_content(&twice));
        assert!(replacement.same_content(&gateway.stored(1).unwrap()));
    }

    #[tokio::test]
    async fn create_should_reject_duplicate_names() {
        let gateway = StubGateway::with_interfaces(vec![Interface::new("A", "REST", "https://a")]);

        let error = gateway
            .create_interface(&Interface::new("A", "REST", "https://b"))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(400));
        assert_eq!(gateway.len(), 1);
    }

    #[tokio::test]
    async fn missing_interfaces_should_yield_not_found() {
        let gateway = StubGateway::new();

        assert!(gateway.get_interface(9).await.unwrap_err().is_not_found());
        assert!(gateway.delete_interface(9).await.unwrap_err().is_not_found());
        assert!(gateway
            .update_interface(9, &Interface::default())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn large_interfaces_should_need_more_than_five_endpoints() {
        let gateway = StubGateway::with_interfaces(vec![
            Interface::new("Small", "REST", "https://s"),
            Interface::new("Large", "REST", "https://l"),
        ]);
        gateway.set_endpoints(1, (0..5).map(|i| Endpoint::new(1, "GET", &format!("/{i}"))).collect());
        gateway.set_endpoints(2, (0..6).map(|i| Endpoint::new(2, "GET", &format!("/{i}"))).collect());

        let large = gateway.list_large_interfaces().await.unwrap();

        assert_eq!(large.len(), 1);
        assert_eq!(large[0].display_name(), "Large");
    }

    #[tokio::test]
    async fn failures_and_calls_should_be_tracked() {
        let gateway = StubGateway::new();
        gateway.fail(Operation::ListInterfaces, GatewayError::application(500, "Internal Server Error"));

        assert!(gateway.list_interfaces().await.is_err());
        gateway.recover(Operation::ListInterfaces);
        assert!(gateway.list_interfaces().await.is_ok());

        assert_eq!(gateway.call_count(Operation::ListInterfaces), 2);
        assert_eq!(gateway.calls(), vec![Operation::ListInterfaces; 2]);
    }
}
