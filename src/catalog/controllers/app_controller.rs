//! # Catalog Application Controller
//!
//! Hosts exactly one view controller at a time and drives it from shell
//! commands. Navigation tears the current controller down before the next
//! one is activated, so a late response can never reach a view the user
//! already left.
//!
//! The loop waits on the next command line and the active controller's
//! in-flight requests together: results are applied and rendered as they
//! arrive, and a request that never answers does not hold up the shell.

use super::{DetailController, FormController, ListController, ViewController};
use crate::catalog::commands::{ShellCommand, HELP_TEXT};
use crate::catalog::events::{NavigationContext, Route, Router, ViewEvent, ViewKind, CATALOG_ROOT};
use crate::catalog::io::{CommandSource, Prompt};
use crate::catalog::services::CatalogGateway;
use crate::catalog::views::TextRenderer;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

enum ActiveView {
    List(ListController),
    Detail(DetailController),
    Form(FormController),
}

impl ActiveView {
    fn controller(&mut self) -> &mut dyn ViewController {
        match self {
            ActiveView::List(controller) => controller,
            ActiveView::Detail(controller) => controller,
            ActiveView::Form(controller) => controller,
        }
    }

    fn kind(&self) -> ViewKind {
        match self {
            ActiveView::List(_) => ViewKind::List,
            ActiveView::Detail(_) => ViewKind::Detail,
            ActiveView::Form(_) => ViewKind::Form,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ActiveView::List(_) => "list",
            ActiveView::Detail(_) => "detail",
            ActiveView::Form(_) => "form",
        }
    }
}

/// The shell that connects command input, view controllers and rendering
pub struct AppController<CS: CommandSource, W: Write> {
    gateway: Arc<dyn CatalogGateway>,
    prompt: Arc<dyn Prompt>,
    router: Router,
    renderer: TextRenderer<W>,
    command_source: CS,
    active: ActiveView,
    current_path: String,
    /// Search requested before the list had loaded
    pending_search: Option<String>,
    verbose: bool,
    should_quit: bool,
}

/// What woke the shell loop up
enum Wakeup {
    Line(Option<String>),
    Applied(bool),
}

impl<CS: CommandSource, W: Write> AppController<CS, W> {
    /// Create the shell with injected I/O (dependency injection)
    ///
    /// The list view is activated immediately.
    pub fn with_io_streams(
        gateway: Arc<dyn CatalogGateway>,
        prompt: Arc<dyn Prompt>,
        command_source: CS,
        render_stream: W,
    ) -> Result<Self> {
        let router = Router::new()?;
        let context = router.resolve(CATALOG_ROOT);
        let active = Self::open_view(&gateway, &prompt, &context);

        Ok(Self {
            gateway,
            prompt,
            router,
            renderer: TextRenderer::with_render_stream(render_stream),
            command_source,
            active,
            current_path: context.path().to_string(),
            pending_search: None,
            verbose: false,
            should_quit: false,
        })
    }

    /// Echo every navigation target
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
        tracing::debug!("Verbose mode set to: {}", verbose);
    }

    /// Path of the view currently shown
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn active_view(&self) -> ViewKind {
        self.active.kind()
    }

    /// Everything rendered so far
    pub fn render_stream(&self) -> &W {
        self.renderer.stream()
    }

    fn open_view(
        gateway: &Arc<dyn CatalogGateway>,
        prompt: &Arc<dyn Prompt>,
        context: &NavigationContext,
    ) -> ActiveView {
        match context.view() {
            ViewKind::List => {
                let mut controller = ListController::new(gateway.clone(), prompt.clone());
                controller.activate();
                ActiveView::List(controller)
            }
            ViewKind::Detail => {
                let mut controller = DetailController::new(gateway.clone(), prompt.clone());
                controller.activate(context);
                ActiveView::Detail(controller)
            }
            ViewKind::Form => {
                let mut controller = FormController::new(gateway.clone());
                controller.activate(context);
                ActiveView::Form(controller)
            }
        }
    }

    /// Leave the current view and activate the one `path` resolves to
    pub fn navigate(&mut self, path: &str) -> Result<()> {
        self.active.controller().teardown();
        let context = self.router.resolve(path);
        self.active = Self::open_view(&self.gateway, &self.prompt, &context);
        self.current_path = context.path().to_string();
        self.pending_search = None;
        tracing::debug!("Navigated to '{}'", self.current_path);
        if self.verbose {
            self.renderer.render_line(&format!("-> {}", self.current_path))?;
        }
        Ok(())
    }

    /// Run the command loop until `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        self.refresh()?;

        while !self.should_quit {
            let busy = self.active.controller().is_busy();
            let controller = self.active.controller();
            let wakeup = tokio::select! {
                biased;
                applied = controller.process_next(), if busy => Wakeup::Applied(applied),
                line = self.command_source.next_line() => Wakeup::Line(line?),
            };

            match wakeup {
                Wakeup::Applied(true) => self.refresh()?,
                Wakeup::Applied(false) => {}
                Wakeup::Line(None) => {
                    tracing::debug!("End of command input");
                    break;
                }
                Wakeup::Line(Some(line)) => {
                    match ShellCommand::parse(&line) {
                        Ok(Some(command)) => {
                            tracing::debug!("Executing {:?}", command);
                            self.execute(command).await?;
                        }
                        Ok(None) => {}
                        Err(e) => self.renderer.render_line(&e.to_string())?,
                    }
                    if !self.should_quit {
                        self.refresh()?;
                    }
                }
            }
        }

        self.active.controller().teardown();
        Ok(())
    }

    /// Apply what has arrived, handle events, then draw the active view
    fn refresh(&mut self) -> Result<()> {
        self.process_view_events()?;
        self.render()?;
        if self.command_source.is_interactive() {
            write!(self.renderer.stream_mut(), "apihub> ")?;
            self.renderer.stream_mut().flush()?;
        }
        Ok(())
    }

    /// Wait until the active view, and any view it navigates to, is idle
    pub async fn settle(&mut self) -> Result<()> {
        loop {
            self.active.controller().settle().await;
            self.process_view_events()?;
            if !self.active.controller().is_busy() {
                return Ok(());
            }
        }
    }

    /// Drain results and view events without waiting, following navigation
    fn process_view_events(&mut self) -> Result<()> {
        loop {
            let controller = self.active.controller();
            controller.poll();
            let events = controller.collect_pending_view_events();

            let mut target = None;
            for event in events {
                match event {
                    ViewEvent::StateChanged => {}
                    ViewEvent::Notify { message } => self.renderer.render_notice(&message)?,
                    ViewEvent::Navigate(route) => {
                        target = Some(route);
                        break;
                    }
                }
            }

            match target {
                Some(route) => self.navigate(&route.path())?,
                None => break,
            }
        }
        self.apply_pending_search();
        Ok(())
    }

    /// Filter once the list has data to filter
    fn apply_pending_search(&mut self) {
        if let ActiveView::List(list) = &mut self.active {
            if !list.state().is_loading {
                if let Some(term) = self.pending_search.take() {
                    list.set_search_term(&term);
                }
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        match &self.active {
            ActiveView::List(controller) => self.renderer.render_list(controller.state()),
            ActiveView::Detail(controller) => self.renderer.render_detail(controller),
            ActiveView::Form(controller) => self.renderer.render_form(controller),
        }
    }

    fn unavailable(&mut self, command: &str) -> Result<()> {
        let message = format!(
            "'{}' is not available in the {} view",
            command,
            self.active.name()
        );
        self.renderer.render_line(&message)
    }

    /// Switch to the list unless it is already shown
    fn ensure_list(&mut self) -> Result<()> {
        if !matches!(self.active, ActiveView::List(_)) {
            self.navigate(CATALOG_ROOT)?;
        }
        Ok(())
    }

    async fn show_server_info(&mut self) -> Result<()> {
        match self.gateway.server_info().await {
            Ok(info) => self.renderer.render_server_info(&info),
            Err(error) => self.renderer.render_notice(error.message()),
        }
    }

    /// Apply one shell command to the active view
    pub async fn execute(&mut self, command: ShellCommand) -> Result<()> {
        match command {
            ShellCommand::List => self.navigate(CATALOG_ROOT)?,
            ShellCommand::Search(term) => {
                self.ensure_list()?;
                self.pending_search = Some(term);
                self.apply_pending_search();
            }
            ShellCommand::Large => {
                self.ensure_list()?;
                if let ActiveView::List(list) = &mut self.active {
                    list.load_large();
                }
            }
            ShellCommand::Open(id) => match &mut self.active {
                ActiveView::List(list) => list.go_to_detail(Some(id)),
                _ => self.navigate(&Route::Detail(id).path())?,
            },
            ShellCommand::New => match &mut self.active {
                ActiveView::List(list) => list.go_to_create(),
                _ => self.navigate(&Route::Create.path())?,
            },
            ShellCommand::Edit(Some(id)) => match &mut self.active {
                ActiveView::List(list) => list.go_to_edit(Some(id)),
                _ => self.navigate(&Route::Edit(id).path())?,
            },
            ShellCommand::Edit(None) => match &mut self.active {
                ActiveView::Detail(detail) => detail.edit(),
                _ => self.unavailable("edit")?,
            },
            ShellCommand::Delete(Some(id)) => match &mut self.active {
                ActiveView::List(list) => match list.find(id).cloned() {
                    Some(entry) => list.request_delete(&entry),
                    None => self
                        .renderer
                        .render_line(&format!("No interface with id {id} in the list"))?,
                },
                ActiveView::Detail(detail)
                    if detail.state().interface.as_ref().and_then(|i| i.id) == Some(id) =>
                {
                    detail.delete()
                }
                _ => self.unavailable("delete")?,
            },
            ShellCommand::Delete(None) => match &mut self.active {
                ActiveView::Detail(detail) => detail.delete(),
                _ => self.unavailable("delete")?,
            },
            ShellCommand::Set { field, value } => match &mut self.active {
                ActiveView::Form(form) => {
                    if let Err(e) = form.set_field(field, &value) {
                        self.renderer.render_line(&e.to_string())?;
                    }
                }
                _ => self.unavailable("set")?,
            },
            ShellCommand::ToggleActive => match &mut self.active {
                ActiveView::Form(form) => form.toggle_active(),
                _ => self.unavailable("toggle")?,
            },
            ShellCommand::Save => match &mut self.active {
                ActiveView::Form(form) => {
                    if !form.submit() {
                        tracing::debug!("Form not submitted");
                    }
                }
                _ => self.unavailable("save")?,
            },
            ShellCommand::Cancel => match &mut self.active {
                ActiveView::Form(form) => form.cancel(),
                _ => self.unavailable("cancel")?,
            },
            ShellCommand::Back => match &mut self.active {
                ActiveView::Detail(detail) => detail.back(),
                ActiveView::Form(form) => form.cancel(),
                ActiveView::List(_) => self.unavailable("back")?,
            },
            ShellCommand::Info => self.show_server_info().await?,
            ShellCommand::Help => self.renderer.render_line(HELP_TEXT)?,
            ShellCommand::Quit => self.should_quit = true,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::io::{MockPrompt, ScriptedCommandSource};
    use crate::catalog::models::Interface;
    use crate::catalog::testing::{Operation, StubGateway};
    use std::time::Duration;

    fn catalog() -> Arc<StubGateway> {
        Arc::new(StubGateway::with_interfaces(vec![
            Interface::new("Cat Facts", "REST", "https://catfact.ninja"),
            Interface::new("Weather", "REST", "https://weather.example"),
        ]))
    }

    async fn run_script(stub: Arc<StubGateway>, prompt: MockPrompt, script: &[&str]) -> String {
        let mut app = AppController::with_io_streams(
            stub,
            Arc::new(prompt),
            ScriptedCommandSource::new(script),
            Vec::new(),
        )
        .unwrap();
        app.run().await.unwrap();
        String::from_utf8(app.render_stream().clone()).unwrap()
    }

    #[tokio::test]
    async fn run_should_render_initial_list() {
        let output = run_script(catalog(), MockPrompt::always(true), &["quit"]).await;

        assert!(output.starts_with("API Interfaces (0 of 0)\n  Loading..."));
        assert!(output.contains("API Interfaces (2 of 2)"));
        assert!(output.contains("Cat Facts"));
    }

    #[tokio::test]
    async fn run_should_accept_commands_while_a_load_hangs() {
        let stub = catalog();
        let _never_released = stub.hold(Operation::ListInterfaces);
        let mut app = AppController::with_io_streams(
            stub.clone(),
            Arc::new(MockPrompt::always(true)),
            ScriptedCommandSource::new(&["new", "quit"]),
            Vec::new(),
        )
        .unwrap();

        let finished = tokio::time::timeout(Duration::from_secs(2), app.run()).await;

        assert!(matches!(finished, Ok(Ok(()))));
        assert_eq!(app.active_view(), ViewKind::Form);
        assert_eq!(stub.calls(), vec![Operation::ListInterfaces]);
    }

    #[tokio::test]
    async fn search_from_detail_should_filter_once_list_has_loaded() {
        let output = run_script(
            catalog(),
            MockPrompt::always(true),
            &["open 2", "search cat", "quit"],
        )
        .await;

        assert!(output.contains("API Interfaces (1 of 2) matching \"cat\""));
    }

    #[tokio::test]
    async fn open_should_show_detail_and_back_should_return() {
        let stub = catalog();
        let mut app = AppController::with_io_streams(
            stub.clone(),
            Arc::new(MockPrompt::always(true)),
            ScriptedCommandSource::new(&[]),
            Vec::new(),
        )
        .unwrap();

        app.execute(ShellCommand::Open(2)).await.unwrap();
        app.settle().await.unwrap();
        assert_eq!(app.active_view(), ViewKind::Detail);
        assert_eq!(app.current_path(), "/api-interfaces/2");

        app.execute(ShellCommand::Back).await.unwrap();
        app.settle().await.unwrap();
        assert_eq!(app.active_view(), ViewKind::List);
        assert_eq!(stub.call_count(Operation::ListInterfaces), 2);
    }

    #[tokio::test]
    async fn create_flow_should_end_on_new_detail() {
        let stub = catalog();
        let output = run_script(
            stub.clone(),
            MockPrompt::always(true),
            &[
                "new",
                "save",
                "set name Dog Facts",
                "set base_url https://dogapi.dog",
                "save",
                "quit",
            ],
        )
        .await;

        assert!(output.contains("! Name is required"));
        assert!(output.contains("Dog Facts [REST] (active)"));
        assert_eq!(stub.call_count(Operation::CreateInterface), 1);
        assert_eq!(stub.len(), 3);
    }

    #[tokio::test]
    async fn commands_outside_their_view_should_be_reported() {
        let output = run_script(catalog(), MockPrompt::always(true), &["save", "back", "quit"]).await;

        assert!(output.contains("'save' is not available in the list view"));
        assert!(output.contains("'back' is not available in the list view"));
    }

    #[tokio::test]
    async fn delete_from_list_should_confirm_and_reload() {
        let stub = catalog();
        let output = run_script(stub.clone(), MockPrompt::always(true), &["delete 1", "quit"]).await;

        assert!(output.contains("API Interfaces (1 of 1)"));
        assert!(stub.stored(1).is_none());
    }

    #[tokio::test]
    async fn unknown_route_should_land_on_list() {
        let stub = catalog();
        let mut app = AppController::with_io_streams(
            stub,
            Arc::new(MockPrompt::always(true)),
            ScriptedCommandSource::new(&[]),
            Vec::new(),
        )
        .unwrap();

        app.navigate("/definitely/not/a/route").unwrap();

        assert_eq!(app.active_view(), ViewKind::List);
        assert_eq!(app.current_path(), "/api-interfaces");
    }

    #[tokio::test]
    async fn info_should_print_backend_banner() {
        let output = run_script(catalog(), MockPrompt::always(true), &["info"]).await;
        assert!(output.contains("Mini API Hub Backend API (version 1.0.0)"));
    }

    #[tokio::test]
    async fn verbose_should_echo_each_view_change() {
        let mut app = AppController::with_io_streams(
            catalog(),
            Arc::new(MockPrompt::always(true)),
            ScriptedCommandSource::new(&[]),
            Vec::new(),
        )
        .unwrap();
        app.set_verbose(true);

        app.navigate("/api-interfaces/new").unwrap();

        let output = String::from_utf8(app.render_stream().clone()).unwrap();
        assert_eq!(output, "-> /api-interfaces/new\n");
    }
}
