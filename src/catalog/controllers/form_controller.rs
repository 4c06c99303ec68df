//! # Form Controller
//!
//! Create and edit form for one interface.
//!
//! The mode is derived from the navigation context: edit mode needs both an
//! id parameter and a literal `edit` path segment. A bare id route belongs
//! to the detail view and opens the form in create mode.

use super::{ViewController, FORM_LOAD_FAILED, FORM_SAVE_FAILED};
use crate::catalog::events::{NavigationContext, Route, ViewEvent};
use crate::catalog::models::{Interface, DEFAULT_AUTH_TYPE, DEFAULT_INTERFACE_TYPE};
use crate::catalog::services::{CatalogGateway, Dispatcher, GatewayResult};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Whether the form creates a new interface or replaces an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    /// Derive the mode from the navigation context
    pub fn from_context(context: &NavigationContext) -> Self {
        match context.id() {
            Some(id) if context.has_segment("edit") => FormMode::Edit(id),
            _ => FormMode::Create,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    /// Id carried into the write payload
    pub fn id(&self) -> Option<i64> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(*id),
        }
    }
}

/// Editable form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Type,
    BaseUrl,
    Description,
    AuthType,
    IsActive,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Type,
        FormField::BaseUrl,
        FormField::Description,
        FormField::AuthType,
        FormField::IsActive,
    ];

    /// Parse a field name as typed in the shell
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Some(FormField::Name),
            "type" => Some(FormField::Type),
            "baseurl" | "url" => Some(FormField::BaseUrl),
            "description" => Some(FormField::Description),
            "authtype" | "auth" => Some(FormField::AuthType),
            "isactive" | "active" => Some(FormField::IsActive),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Type => "Type",
            FormField::BaseUrl => "Base URL",
            FormField::Description => "Description",
            FormField::AuthType => "Auth Type",
            FormField::IsActive => "Active",
        }
    }
}

/// A failed validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required(FormField),
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::Required(field) => *field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required(field) => write!(f, "{} is required", field.label()),
        }
    }
}

/// Current field values
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceForm {
    pub name: String,
    pub interface_type: String,
    pub base_url: String,
    pub description: String,
    pub auth_type: String,
    pub is_active: bool,
}

impl Default for InterfaceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            interface_type: DEFAULT_INTERFACE_TYPE.to_string(),
            base_url: String::new(),
            description: String::new(),
            auth_type: DEFAULT_AUTH_TYPE.to_string(),
            is_active: true,
        }
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

fn empty_to_none(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl InterfaceForm {
    /// Copy a loaded interface into the form
    ///
    /// Missing or empty source values fall back to the defaults. The active
    /// flag only falls back when absent, so a stored `false` survives.
    pub fn overlay(&mut self, source: &Interface) {
        self.name = or_default(&source.name, "");
        self.interface_type = or_default(&source.interface_type, DEFAULT_INTERFACE_TYPE);
        self.base_url = or_default(&source.base_url, "");
        self.description = or_default(&source.description, "");
        self.auth_type = or_default(&source.auth_type, DEFAULT_AUTH_TYPE);
        self.is_active = source.is_active.unwrap_or(true);
    }

    /// Failed rules, in field order
    pub fn validate(&self) -> Vec<ValidationError> {
        [
            (FormField::Name, &self.name),
            (FormField::Type, &self.interface_type),
            (FormField::BaseUrl, &self.base_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| ValidationError::Required(field))
        .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Build the write payload; empty description and auth become absent
    pub fn to_payload(&self, id: Option<i64>) -> Interface {
        Interface {
            id,
            name: Some(self.name.clone()),
            interface_type: Some(self.interface_type.clone()),
            base_url: Some(self.base_url.clone()),
            description: empty_to_none(&self.description),
            auth_type: empty_to_none(&self.auth_type),
            is_active: Some(self.is_active),
            ..Interface::default()
        }
    }

    /// Current value of a field as text
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Type => self.interface_type.clone(),
            FormField::BaseUrl => self.base_url.clone(),
            FormField::Description => self.description.clone(),
            FormField::AuthType => self.auth_type.clone(),
            FormField::IsActive => self.is_active.to_string(),
        }
    }
}

/// State rendered by the form view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub form: InterfaceForm,
    pub touched: BTreeSet<FormField>,
    pub is_loading: bool,
    pub is_submitting: bool,
}

enum FormMessage {
    Loaded(GatewayResult<Interface>),
    Submitted(GatewayResult<Interface>),
}

/// Controller behind the create/edit form
pub struct FormController {
    gateway: Arc<dyn CatalogGateway>,
    mode: FormMode,
    state: FormState,
    dispatcher: Dispatcher<FormMessage>,
    pending_view_events: Vec<ViewEvent>,
}

impl FormController {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self {
            gateway,
            mode: FormMode::Create,
            state: FormState::default(),
            dispatcher: Dispatcher::new(),
            pending_view_events: Vec::new(),
        }
    }

    /// Reset to defaults, infer the mode, and load the interface when editing
    pub fn activate(&mut self, context: &NavigationContext) {
        self.mode = FormMode::from_context(context);
        self.state = FormState::default();
        tracing::debug!("Form opened in {:?} mode", self.mode);

        if let FormMode::Edit(id) = self.mode {
            self.state.is_loading = true;
            let gateway = self.gateway.clone();
            self.dispatcher.spawn("get interface", async move {
                FormMessage::Loaded(gateway.get_interface(id).await)
            });
        }
        self.emit_view_event(ViewEvent::StateChanged);
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn form(&self) -> &InterfaceForm {
        &self.state.form
    }

    /// Validation errors for fields the user has touched
    pub fn visible_errors(&self) -> Vec<ValidationError> {
        self.state
            .form
            .validate()
            .into_iter()
            .filter(|error| self.state.touched.contains(&error.field()))
            .collect()
    }

    /// Set a field from text; the active flag accepts `true` or `false`
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<()> {
        let form = &mut self.state.form;
        match field {
            FormField::Name => form.name = value.to_string(),
            FormField::Type => form.interface_type = value.to_string(),
            FormField::BaseUrl => form.base_url = value.to_string(),
            FormField::Description => form.description = value.to_string(),
            FormField::AuthType => form.auth_type = value.to_string(),
            FormField::IsActive => match value.trim().parse::<bool>() {
                Ok(active) => form.is_active = active,
                Err(_) => bail!("Active must be 'true' or 'false', got '{}'", value),
            },
        }
        self.state.touched.insert(field);
        self.emit_view_event(ViewEvent::StateChanged);
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) {
        self.state.form.is_active = active;
        self.state.touched.insert(FormField::IsActive);
        self.emit_view_event(ViewEvent::StateChanged);
    }

    pub fn toggle_active(&mut self) {
        let active = !self.state.form.is_active;
        self.set_active(active);
    }

    /// Validate and send the form
    ///
    /// Returns whether a request was started. Invalid input marks every
    /// field as touched and sends nothing.
    pub fn submit(&mut self) -> bool {
        if self.is_torn_down() || self.state.is_loading || self.state.is_submitting {
            tracing::debug!("Submit ignored while busy");
            return false;
        }

        if !self.state.form.is_valid() {
            self.state.touched.extend(FormField::ALL);
            self.emit_view_event(ViewEvent::StateChanged);
            return false;
        }

        let payload = self.state.form.to_payload(self.mode.id());
        self.state.is_submitting = true;
        self.emit_view_event(ViewEvent::StateChanged);

        let gateway = self.gateway.clone();
        match self.mode {
            FormMode::Create => self.dispatcher.spawn("create interface", async move {
                FormMessage::Submitted(gateway.create_interface(&payload).await)
            }),
            FormMode::Edit(id) => self.dispatcher.spawn("update interface", async move {
                FormMessage::Submitted(gateway.update_interface(id, &payload).await)
            }),
        }
        true
    }

    /// Leave without saving
    pub fn cancel(&mut self) {
        self.emit_view_event(ViewEvent::Navigate(Route::List));
    }

    fn apply(&mut self, message: FormMessage) {
        match message {
            FormMessage::Loaded(Ok(interface)) => {
                self.state.form.overlay(&interface);
                self.state.is_loading = false;
                self.emit_view_event(ViewEvent::StateChanged);
            }
            FormMessage::Loaded(Err(error)) => {
                tracing::warn!("Error loading API interface: {}", error.message());
                self.state.is_loading = false;
                self.emit_view_event(ViewEvent::notify(FORM_LOAD_FAILED));
                self.emit_view_event(ViewEvent::Navigate(Route::List));
            }
            FormMessage::Submitted(Ok(saved)) => {
                self.state.is_submitting = false;
                let route = match saved.id {
                    Some(id) => Route::Detail(id),
                    None => Route::List,
                };
                self.emit_view_event(ViewEvent::Navigate(route));
            }
            FormMessage::Submitted(Err(error)) => {
                tracing::warn!("Error saving API interface: {}", error.message());
                self.state.is_submitting = false;
                self.emit_view_event(ViewEvent::notify(FORM_SAVE_FAILED));
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
impl ViewController for FormController {
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
        tracing::debug!("Form controller torn down");
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
    use crate::catalog::events::{Router, ViewKind};
    use crate::catalog::services::GatewayError;
    use crate::catalog::testing::{Operation, StubGateway};

    fn context(path: &str) -> NavigationContext {
        Router::new().unwrap().resolve(path)
    }

    fn navigations(events: Vec<ViewEvent>) -> Vec<ViewEvent> {
        events
            .into_iter()
            .filter(|event| *event != ViewEvent::StateChanged)
            .collect()
    }

    #[test]
    fn mode_should_need_id_and_edit_segment() {
        assert_eq!(
            FormMode::from_context(&context("/api-interfaces/3/edit")),
            FormMode::Edit(3)
        );
        assert_eq!(
            FormMode::from_context(&NavigationContext::new(ViewKind::Form, "/api-interfaces/3")
                .with_param("id", "3")),
            FormMode::Create
        );
        assert_eq!(
            FormMode::from_context(&context("/api-interfaces/new")),
            FormMode::Create
        );
        assert_eq!(
            FormMode::from_context(&NavigationContext::new(ViewKind::Form, "/x/edit")),
            FormMode::Create
        );
    }

    #[test]
    fn defaults_should_match_blank_form() {
        let form = InterfaceForm::default();
        assert_eq!(form.name, "");
        assert_eq!(form.interface_type, "REST");
        assert_eq!(form.base_url, "");
        assert_eq!(form.description, "");
        assert_eq!(form.auth_type, "NONE");
        assert!(form.is_active);
    }

    #[test]
    fn overlay_should_substitute_defaults_but_keep_false() {
        let source = Interface {
            id: Some(5),
            name: Some("Legacy".to_string()),
            interface_type: Some(String::new()),
            base_url: None,
            description: None,
            auth_type: None,
            is_active: Some(false),
            ..Interface::default()
        };
        let mut form = InterfaceForm::default();

        form.overlay(&source);

        assert_eq!(form.name, "Legacy");
        assert_eq!(form.interface_type, "REST");
        assert_eq!(form.base_url, "");
        assert_eq!(form.description, "");
        assert_eq!(form.auth_type, "NONE");
        assert!(!form.is_active);

        form.overlay(&Interface::default());
        assert!(form.is_active);
    }

    #[test]
    fn validate_should_report_required_fields() {
        let mut form = InterfaceForm::default();
        form.interface_type.clear();

        assert_eq!(
            form.validate(),
            vec![
                ValidationError::Required(FormField::Name),
                ValidationError::Required(FormField::Type),
                ValidationError::Required(FormField::BaseUrl),
            ]
        );
        assert_eq!(form.validate()[0].to_string(), "Name is required");
    }

    #[test]
    fn payload_should_null_empty_optional_fields() {
        let form = InterfaceForm {
            name: "Cat Facts".to_string(),
            base_url: "https://catfact.ninja".to_string(),
            description: String::new(),
            auth_type: String::new(),
            ..InterfaceForm::default()
        };

        let payload = form.to_payload(Some(7));

        assert_eq!(payload.id, Some(7));
        assert_eq!(payload.description, None);
        assert_eq!(payload.auth_type, None);
        assert_eq!(payload.is_active, Some(true));
        assert_eq!(payload.interface_type.as_deref(), Some("REST"));
    }

    #[test]
    fn field_names_should_parse_loosely() {
        assert_eq!(FormField::parse("base_url"), Some(FormField::BaseUrl));
        assert_eq!(FormField::parse("baseUrl"), Some(FormField::BaseUrl));
        assert_eq!(FormField::parse("auth-type"), Some(FormField::AuthType));
        assert_eq!(FormField::parse("active"), Some(FormField::IsActive));
        assert_eq!(FormField::parse("colour"), None);
    }

    #[tokio::test]
    async fn create_mode_should_not_touch_network_until_submit() {
        let stub = Arc::new(StubGateway::new());
        let mut form = FormController::new(stub.clone());

        form.activate(&context("/api-interfaces/new"));
        form.settle().await;

        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.form(), &InterfaceForm::default());
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_submit_should_touch_everything_and_send_nothing() {
        let stub = Arc::new(StubGateway::new());
        let mut form = FormController::new(stub.clone());
        form.activate(&context("/api-interfaces/new"));

        assert!(form.visible_errors().is_empty());
        assert!(!form.submit());
        form.settle().await;

        assert!(stub.calls().is_empty());
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.state().touched.len(), FormField::ALL.len());
        assert_eq!(form.visible_errors().len(), 2);
        assert!(!form.state().is_submitting);
    }

    #[tokio::test]
    async fn create_submit_should_navigate_to_new_detail() {
        let stub = Arc::new(StubGateway::new());
        let mut form = FormController::new(stub.clone());
        form.activate(&context("/api-interfaces/new"));
        form.set_field(FormField::Name, "Cat Facts").unwrap();
        form.set_field(FormField::BaseUrl, "https://catfact.ninja").unwrap();
        form.collect_pending_view_events();

        assert!(form.submit());
        assert!(form.state().is_submitting);
        form.settle().await;

        assert_eq!(
            navigations(form.collect_pending_view_events()),
            vec![ViewEvent::Navigate(Route::Detail(1))]
        );
        let stored = stub.stored(1).unwrap();
        assert_eq!(stored.description, None);
        assert_eq!(stored.auth_type.as_deref(), Some("NONE"));
    }

    #[tokio::test]
    async fn edit_mode_should_preserve_inactive_flag() {
        let stub = Arc::new(StubGateway::new());
        let mut inactive = Interface::new("Legacy", "SOAP", "https://legacy");
        inactive.is_active = Some(false);
        stub.add_interface(inactive);
        let mut form = FormController::new(stub.clone());

        form.activate(&context("/api-interfaces/1/edit"));
        assert!(form.state().is_loading);
        form.settle().await;

        assert_eq!(form.mode(), FormMode::Edit(1));
        assert!(!form.form().is_active);
        assert_eq!(form.form().interface_type, "SOAP");
        assert!(!form.state().is_loading);
    }

    #[tokio::test]
    async fn edit_submit_should_replace_and_navigate_to_detail() {
        let stub = Arc::new(StubGateway::with_interfaces(vec![Interface::new(
            "Weather",
            "REST",
            "https://weather.example",
        )]));
        let mut form = FormController::new(stub.clone());
        form.activate(&context("/api-interfaces/1/edit"));
        form.settle().await;

        form.set_field(FormField::Description, "Forecasts").unwrap();
        form.toggle_active();
        form.collect_pending_view_events();
        assert!(form.submit());
        form.settle().await;

        assert_eq!(stub.call_count(Operation::UpdateInterface), 1);
        let stored = stub.stored(1).unwrap();
        assert_eq!(stored.description.as_deref(), Some("Forecasts"));
        assert_eq!(stored.is_active, Some(false));
        assert_eq!(
            navigations(form.collect_pending_view_events()),
            vec![ViewEvent::Navigate(Route::Detail(1))]
        );
    }

    #[tokio::test]
    async fn edit_load_failure_should_notify_and_redirect() {
        let stub = Arc::new(StubGateway::new());
        let mut form = FormController::new(stub.clone());

        form.activate(&context("/api-interfaces/9/edit"));
        form.settle().await;

        assert_eq!(
            navigations(form.collect_pending_view_events()),
            vec![
                ViewEvent::notify("Failed to load API interface. Redirecting..."),
                ViewEvent::Navigate(Route::List),
            ]
        );
    }

    #[tokio::test]
    async fn submit_failure_should_keep_values_for_retry() {
        let stub = Arc::new(StubGateway::new());
        stub.fail(
            Operation::CreateInterface,
            GatewayError::application(400, "Bad Request"),
        );
        let mut form = FormController::new(stub.clone());
        form.activate(&context("/api-interfaces/new"));
        form.set_field(FormField::Name, "Cat Facts").unwrap();
        form.set_field(FormField::BaseUrl, "https://catfact.ninja").unwrap();
        form.collect_pending_view_events();

        form.submit();
        form.settle().await;

        assert_eq!(
            navigations(form.collect_pending_view_events()),
            vec![ViewEvent::notify("Failed to save API interface. Please try again.")]
        );
        assert_eq!(form.form().name, "Cat Facts");
        assert!(!form.state().is_submitting);

        stub.recover(Operation::CreateInterface);
        assert!(form.submit());
        form.settle().await;
        assert_eq!(stub.len(), 1);
    }

    #[tokio::test]
    async fn submit_should_be_ignored_while_submitting() {
        let stub = Arc::new(StubGateway::new());
        let gate = stub.hold(Operation::CreateInterface);
        let mut form = FormController::new(stub.clone());
        form.activate(&context("/api-interfaces/new"));
        form.set_field(FormField::Name, "A").unwrap();
        form.set_field(FormField::BaseUrl, "https://a").unwrap();

        assert!(form.submit());
        assert!(!form.submit());
        tokio::task::yield_now().await;
        gate.notify_one();
        form.settle().await;

        assert_eq!(stub.call_count(Operation::CreateInterface), 1);
    }

    #[tokio::test]
    async fn active_flag_should_reject_non_boolean_text() {
        let mut form = FormController::new(Arc::new(StubGateway::new()));
        assert!(form.set_field(FormField::IsActive, "maybe").is_err());
        assert!(form.set_field(FormField::IsActive, "false").is_ok());
        assert!(!form.form().is_active);
    }

    #[tokio::test]
    async fn teardown_should_drop_late_submit_result() {
        let stub = Arc::new(StubGateway::new());
        let gate = stub.hold(Operation::CreateInterface);
        let mut form = FormController::new(stub.clone());
        form.activate(&context("/api-interfaces/new"));
        form.set_field(FormField::Name, "A").unwrap();
        form.set_field(FormField::BaseUrl, "https://a").unwrap();
        form.submit();
        tokio::task::yield_now().await;

        form.teardown();
        gate.notify_one();
        form.settle().await;

        assert!(form.collect_pending_view_events().is_empty());
        assert!(form.state().is_submitting);
    }

    #[test]
    fn payload_should_keep_whitespace_only_description() {
        let form = InterfaceForm {
            name: "Cat Facts".to_string(),
            base_url: "https://catfact.ninja".to_string(),
            description: "  ".to_string(),
            ..InterfaceForm::default()
        };

        let payload = form.to_payload(None);

        assert_eq!(payload.description.as_deref(), Some("  "));
        assert_eq!(payload.auth_type.as_deref(), Some("NONE"));
    }
}
