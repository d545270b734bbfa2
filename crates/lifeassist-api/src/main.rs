//! lifeassist CLI and HTTP API entry point.
//!
//! Binary name: `lifeassist`
//!
//! Parses CLI arguments, sets up tracing, then either starts the HTTP
//! server or runs a terminal client command against a running server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use lifeassist_core::prompt::TaskKind;
use lifeassist_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::client::ApiClient;
use cli::{Cli, Commands, read_input};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 if cli.command.is_server() => "info",
        0 => "warn",
        1 => "info,lifeassist=debug",
        _ => "trace",
    };
    init_tracing(cli.otel, filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::init(cli.config.as_deref()).await?;
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            if !state.api_key_present {
                tracing::warn!("GEMINI_API_KEY / GOOGLE_API_KEY not set; replies will be error markers");
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} lifeassist API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {} {}",
                    console::style("Data:").dim(),
                    state.data_dir.display()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Health { server } => {
            let client = ApiClient::new(&server.url)?;
            cli::assist::health(&client, cli.json).await?;
        }

        Commands::Summarize { text, server } => {
            let client = ApiClient::new(&server.url)?;
            let text = read_input(text)?;
            cli::assist::run_task(&client, TaskKind::Summarize, &text, cli.json, cli.quiet).await?;
        }

        Commands::Plan { tasks, server } => {
            let client = ApiClient::new(&server.url)?;
            let tasks = read_input(tasks)?;
            cli::assist::run_task(&client, TaskKind::Plan, &tasks, cli.json, cli.quiet).await?;
        }

        Commands::Rephrase { text, server } => {
            let client = ApiClient::new(&server.url)?;
            let text = read_input(text)?;
            cli::assist::run_task(&client, TaskKind::Rephrase, &text, cli.json, cli.quiet).await?;
        }

        Commands::Quote { mood, server } => {
            let client = ApiClient::new(&server.url)?;
            cli::assist::run_task(&client, TaskKind::Quote, &mood, cli.json, cli.quiet).await?;
        }

        Commands::History { session, server } => {
            let client = ApiClient::new(&server.url)?;
            cli::chat::show_history(&client, &session, cli.json).await?;
        }

        Commands::Chat {
            message,
            session,
            no_stream,
            server,
        } => {
            let client = ApiClient::new(&server.url)?;
            cli::chat::send_message(&client, &session, message, !no_stream, cli.json).await?;
        }

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "lifeassist", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that signal is ignored and the other
/// one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
