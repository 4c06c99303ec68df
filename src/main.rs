//! # apihub Main Entry Point
//!
//! Line-oriented shell over the API interface catalog.

use anyhow::Result;
use apihub::catalog::io::{StdinCommandSource, TerminalPrompt};
use apihub::catalog::views::TextRenderer;
use apihub::cmd_args::CommandLineArgs;
use apihub::{config, AppController, CatalogGateway, HttpCatalogGateway};
use std::sync::Arc;
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing_subscriber();

    let cmd_args = CommandLineArgs::parse();
    let profile = config::resolve_profile(&cmd_args)?;
    let gateway = HttpCatalogGateway::from_profile(&profile)?;

    if cmd_args.info() {
        return print_server_info(&gateway).await;
    }

    if cmd_args.verbose() {
        eprintln!("Using profile '{}' at {}", profile.name, gateway.base_url());
    }

    let mut app = AppController::with_io_streams(
        Arc::new(gateway),
        Arc::new(TerminalPrompt::new()),
        StdinCommandSource::new(),
        std::io::stdout(),
    )?;
    app.set_verbose(cmd_args.verbose());
    app.run().await
}

async fn print_server_info(gateway: &HttpCatalogGateway) -> Result<()> {
    let mut renderer = TextRenderer::with_render_stream(std::io::stdout());
    match gateway.server_info().await {
        Ok(info) => renderer.render_server_info(&info),
        Err(error) => {
            renderer.render_notice(error.message())?;
            Err(error.into())
        }
    }
}

fn init_tracing_subscriber() {
    let mut filter = EnvFilter::from_env(format!(
        "{}_LOG_LEVEL",
        env!("CARGO_PKG_NAME").to_uppercase()
    ));
    for directive in [
        "reqwest=warn",
        "hyper=warn",
        "hyper_util=warn",
        "tokio=warn",
        "tokio_util=warn",
        "rustls=warn",
    ] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}
