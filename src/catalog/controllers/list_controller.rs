//! # List Controller
//!
//! Loads the whole catalog, filters it client-side by a search term, and
//! deletes entries after confirmation.
//!
//! Every load is tagged with a generation number. A response is applied only
//! if no newer load was started in the meantime, so the last load triggered
//! is the one that ends up on screen regardless of arrival order.

use super::{delete_confirmation, ViewController, DELETE_FAILED};
use crate::catalog::events::{Route, ViewEvent};
use crate::catalog::io::Prompt;
use crate::catalog::models::Interface;
use crate::catalog::services::{CatalogGateway, Dispatcher, GatewayResult};
use async_trait::async_trait;
use std::sync::Arc;

/// State rendered by the list view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    /// Everything the last applied load returned
    pub interfaces: Vec<Interface>,
    /// What the view shows
    pub filtered: Vec<Interface>,
    pub search_term: String,
    pub is_loading: bool,
}

enum ListMessage {
    Loaded {
        generation: u64,
        result: GatewayResult<Vec<Interface>>,
    },
    Deleted {
        id: i64,
        result: GatewayResult<()>,
    },
}

/// Controller behind the catalog list view
pub struct ListController {
    gateway: Arc<dyn CatalogGateway>,
    prompt: Arc<dyn Prompt>,
    state: ListState,
    generation: u64,
    dispatcher: Dispatcher<ListMessage>,
    pending_view_events: Vec<ViewEvent>,
}

/// Case-insensitive substring filter over name, type and description
///
/// A blank term keeps everything. Order is preserved either way.
pub fn filter_interfaces(interfaces: &[Interface], term: &str) -> Vec<Interface> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return interfaces.to_vec();
    }

    interfaces
        .iter()
        .filter(|interface| {
            [
                &interface.name,
                &interface.interface_type,
                &interface.description,
            ]
            .iter()
            .any(|field| {
                field
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .cloned()
        .collect()
}

impl ListController {
    pub fn new(gateway: Arc<dyn CatalogGateway>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            gateway,
            prompt,
            state: ListState::default(),
            generation: 0,
            dispatcher: Dispatcher::new(),
            pending_view_events: Vec::new(),
        }
    }

    /// Entry point when the view is shown
    pub fn activate(&mut self) {
        self.load();
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Generation of the most recently started load
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reload the full catalog
    pub fn load(&mut self) {
        let gateway = self.gateway.clone();
        self.start_load("list interfaces", async move { gateway.list_interfaces().await });
    }

    /// Load only interfaces with more than five endpoints
    pub fn load_large(&mut self) {
        let gateway = self.gateway.clone();
        self.start_load("list large interfaces", async move {
            gateway.list_large_interfaces().await
        });
    }

    fn start_load<F>(&mut self, label: &'static str, request: F)
    where
        F: std::future::Future<Output = GatewayResult<Vec<Interface>>> + Send + 'static,
    {
        if self.is_torn_down() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        self.state.is_loading = true;
        self.emit_view_event(ViewEvent::StateChanged);

        self.dispatcher.spawn(label, async move {
            ListMessage::Loaded {
                generation,
                result: request.await,
            }
        });
    }

    /// Update the search term and refilter
    pub fn set_search_term(&mut self, term: &str) {
        self.state.search_term = term.to_string();
        self.filter();
    }

    /// Recompute the filtered sequence from memory
    pub fn filter(&mut self) {
        self.state.filtered = filter_interfaces(&self.state.interfaces, &self.state.search_term);
        tracing::debug!(
            "Filter '{}' kept {} of {} interfaces",
            self.state.search_term,
            self.state.filtered.len(),
            self.state.interfaces.len()
        );
        self.emit_view_event(ViewEvent::StateChanged);
    }

    /// Look up a loaded interface by id
    pub fn find(&self, id: i64) -> Option<&Interface> {
        self.state
            .interfaces
            .iter()
            .find(|interface| interface.id == Some(id))
    }

    /// Delete an entry after confirmation, then reload
    ///
    /// Entries without an id are ignored without asking.
    pub fn request_delete(&mut self, entry: &Interface) {
        let Some(id) = entry.id else {
            tracing::debug!("Ignoring delete of unsaved interface");
            return;
        };
        if self.is_torn_down() {
            return;
        }
        if !self.prompt.confirm(&delete_confirmation(entry.display_name())) {
            tracing::debug!("Delete of interface {} declined", id);
            return;
        }

        let gateway = self.gateway.clone();
        self.dispatcher.spawn("delete interface", async move {
            ListMessage::Deleted {
                id,
                result: gateway.delete_interface(id).await,
            }
        });
    }

    pub fn go_to_detail(&mut self, id: Option<i64>) {
        if let Some(id) = id {
            self.emit_view_event(ViewEvent::Navigate(Route::Detail(id)));
        }
    }

    pub fn go_to_edit(&mut self, id: Option<i64>) {
        if let Some(id) = id {
            self.emit_view_event(ViewEvent::Navigate(Route::Edit(id)));
        }
    }

    pub fn go_to_create(&mut self) {
        self.emit_view_event(ViewEvent::Navigate(Route::Create));
    }

    fn apply(&mut self, message: ListMessage) {
        match message {
            ListMessage::Loaded { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(
                        "Discarding load {} superseded by load {}",
                        generation,
                        self.generation
                    );
                    return;
                }
                self.state.is_loading = false;
                match result {
                    Ok(interfaces) => {
                        tracing::debug!("Loaded {} interfaces", interfaces.len());
                        self.state.filtered = interfaces.clone();
                        self.state.interfaces = interfaces;
                    }
                    Err(error) => {
                        tracing::warn!("Error loading API interfaces: {}", error.message());
                    }
                }
                self.emit_view_event(ViewEvent::StateChanged);
            }
            ListMessage::Deleted { id, result } => match result {
                Ok(()) => {
                    tracing::debug!("Deleted interface {}", id);
                    self.load();
                }
                Err(error) => {
                    tracing::warn!("Error deleting API interface {}: {}", id, error.message());
                    self.emit_view_event(ViewEvent::notify(DELETE_FAILED));
                }
            },
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
impl ViewController for ListController {
    fn poll(&mut self) -> bool {
        let mut applied = false;
        while let Some(message) = self.dispatcher.try_next() {
            self.apply(message);
            applied = true;
        }
        applied
    }

    async fn process_next(&mut self) -> bool {
        match self.dispatcher.next().await {
            Some(message) => {
                self.apply(message);
                true
            }
            None => false,
        }
    }

    fn is_busy(&self) -> bool {
        self.dispatcher.in_flight() > 0
    }

    fn teardown(&mut self) {
        tracing::debug!("List controller torn down");
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
