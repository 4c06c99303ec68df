//! # Detail Controller
//!
//! Shows one interface and its endpoints. The interface and the endpoint
//! list are requested together; only the interface is required for the view
//! to render, endpoints are best effort.

use super::{
    delete_confirmation, EndpointSublistController, ViewController, DELETE_FAILED,
    DETAIL_LOAD_FAILED, DETAIL_MISSING_ID,
};
use crate::catalog::events::{NavigationContext, Route, ViewEvent};
use crate::catalog::io::Prompt;
use crate::catalog::models::{Endpoint, Interface};
use crate::catalog::services::{CatalogGateway, Dispatcher, GatewayResult};
use async_trait::async_trait;
use std::sync::Arc;

/// State rendered by the detail view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub interface: Option<Interface>,
    pub endpoints: Vec<Endpoint>,
    pub is_loading: bool,
    /// Inline error replacing the content area
    pub error: Option<String>,
}

enum DetailMessage {
    InterfaceLoaded(GatewayResult<Interface>),
    EndpointsLoaded(GatewayResult<Vec<Endpoint>>),
    Deleted(GatewayResult<()>),
}

/// Controller behind the interface detail view
pub struct DetailController {
    gateway: Arc<dyn CatalogGateway>,
    prompt: Arc<dyn Prompt>,
    state: DetailState,
    sublist: Option<EndpointSublistController>,
    dispatcher: Dispatcher<DetailMessage>,
    pending_view_events: Vec<ViewEvent>,
}

impl DetailController {
    pub fn new(gateway: Arc<dyn CatalogGateway>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            gateway,
            prompt,
            state: DetailState::default(),
            sublist: None,
            dispatcher: Dispatcher::new(),
            pending_view_events: Vec::new(),
        }
    }

    /// Read the id from the navigation context and start both loads
    pub fn activate(&mut self, context: &NavigationContext) {
        let Some(id) = context.id() else {
            tracing::debug!("Detail view opened without an id: '{}'", context.path());
            self.state.error = Some(DETAIL_MISSING_ID.to_string());
            self.state.is_loading = false;
            self.emit_view_event(ViewEvent::StateChanged);
            return;
        };

        self.state.is_loading = true;
        self.state.error = None;
        self.emit_view_event(ViewEvent::StateChanged);

        let gateway = self.gateway.clone();
        self.dispatcher.spawn("get interface", async move {
            DetailMessage::InterfaceLoaded(gateway.get_interface(id).await)
        });

        let gateway = self.gateway.clone();
        self.dispatcher.spawn("list endpoints", async move {
            DetailMessage::EndpointsLoaded(gateway.list_endpoints(id).await)
        });
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Embedded endpoint table, present once the interface has loaded
    pub fn sublist(&self) -> Option<&EndpointSublistController> {
        self.sublist.as_ref()
    }

    /// Open the form for the loaded interface
    pub fn edit(&mut self) {
        if let Some(id) = self.loaded_id() {
            self.emit_view_event(ViewEvent::Navigate(Route::Edit(id)));
        }
    }

    /// Delete the loaded interface after confirmation
    pub fn delete(&mut self) {
        let Some(interface) = self.state.interface.as_ref() else {
            return;
        };
        let Some(id) = interface.id else {
            return;
        };
        if self.is_torn_down() {
            return;
        }
        if !self.prompt.confirm(&delete_confirmation(interface.display_name())) {
            tracing::debug!("Delete of interface {} declined", id);
            return;
        }

        let gateway = self.gateway.clone();
        self.dispatcher.spawn("delete interface", async move {
            DetailMessage::Deleted(gateway.delete_interface(id).await)
        });
    }

    /// Return to the list
    pub fn back(&mut self) {
        self.emit_view_event(ViewEvent::Navigate(Route::List));
    }

    fn loaded_id(&self) -> Option<i64> {
        self.state.interface.as_ref().and_then(|interface| interface.id)
    }

    fn apply(&mut self, message: DetailMessage) {
        match message {
            DetailMessage::InterfaceLoaded(Ok(interface)) => {
                tracing::debug!("Loaded interface '{}'", interface.display_name());
                let mut sublist = EndpointSublistController::new(self.gateway.clone());
                sublist.activate(interface.id);
                self.sublist = Some(sublist);
                self.state.interface = Some(interface);
                self.state.is_loading = false;
                self.emit_view_event(ViewEvent::StateChanged);
            }
            DetailMessage::InterfaceLoaded(Err(error)) => {
                tracing::warn!("Error loading API interface: {}", error.message());
                self.state.error = Some(DETAIL_LOAD_FAILED.to_string());
                self.state.is_loading = false;
                self.emit_view_event(ViewEvent::StateChanged);
            }
            DetailMessage::EndpointsLoaded(Ok(endpoints)) => {
                tracing::debug!("Loaded {} endpoints", endpoints.len());
                self.state.endpoints = endpoints;
                self.emit_view_event(ViewEvent::StateChanged);
            }
            DetailMessage::EndpointsLoaded(Err(error)) => {
                tracing::warn!("Error loading endpoints: {}", error.message());
            }
            DetailMessage::Deleted(Ok(())) => {
                self.emit_view_event(ViewEvent::Navigate(Route::List));
            }
            DetailMessage::Deleted(Err(error)) => {
                tracing::warn!("Error deleting API interface: {}", error.message());
                self.emit_view_event(ViewEvent::notify(DELETE_FAILED));
            }
        }
    }

    fn emit_view_event(&mut self, event: ViewEvent) {
        if self.dispatcher.is_cancelled() {
            tracing::debug!("Dropping view event after teardown: {:?}", event);
            return;
        }
        self.pending_view_events.push(event);
    }
}

#[async_trait]
impl ViewController for DetailController {
    fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Some(message) = self.dispatcher.try_next() {
            self.apply(message);
            applied = true;
        }
        if let Some(sublist) = self.sublist.as_mut() {
            applied |= sublist.poll();
        }
        applied
    }

    async fn process_next(&mut self) -> bool {
        let message = match self.sublist.as_mut() {
            Some(sublist) if sublist.is_busy() => {
                let own_pending = self.dispatcher.in_flight() > 0;
                tokio::select! {
                    message = self.dispatcher.next(), if own_pending => message,
                    applied = sublist.process_next() => return applied,
                }
            }
            _ => self.dispatcher.next().await,
        };

        match message {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    fn is_busy(&self) -> bool {
        self.dispatcher.in_flight() > 0
            || self.sublist.as_ref().is_some_and(|sublist| sublist.is_busy())
    }

    fn teardown(&mut self) {
        tracing::debug!("Detail controller torn down");
        self.dispatcher.cancel();
        if let Some(sublist) = self.sublist.as_mut() {
            sublist.teardown();
        }
        self.pending_view_events.clear();
    }

    fn is_torn_down(&self) -> bool {
        self.dispatcher.is_cancelled()
    }

    fn collect_pending_view_events(&mut self) -> Vec<ViewEvent> {
        let mut events = std::mem::take(&mut self.pending_view_events);
        if let Some(sublist) = self.sublist.as_mut() {
            events.extend(sublist.collect_pending_view_events());
        }
        events
    }
}
