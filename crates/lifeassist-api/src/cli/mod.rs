//! CLI command definitions and dispatch for the `lifeassist` binary.
//!
//! `serve` runs the HTTP API. Every other command is a thin terminal client
//! that talks to a running server over HTTP.

pub mod assist;
pub mod chat;
pub mod client;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Server URL used by client commands when neither `--url` nor
/// `LIFEASSIST_URL` is given.
pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

/// AI life assistant: summaries, daily plans, rephrasing, quotes and chat.
#[derive(Parser)]
#[command(name = "lifeassist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and results.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to `<data dir>/config.toml`).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where client commands find the server.
#[derive(Args, Clone, Debug)]
pub struct ServerArgs {
    /// Base URL of a running `lifeassist serve`.
    #[arg(long, env = "LIFEASSIST_URL", default_value = DEFAULT_URL)]
    pub url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server.
    Serve {
        /// Address to bind (overrides `server.host`).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides `server.port`).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check that the server is up and whether it has an API key.
    Health {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Summarize text into bullet points (`-` reads stdin).
    Summarize {
        text: String,
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Turn a task list into a prioritized daily plan (`-` reads stdin).
    Plan {
        tasks: String,
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Rephrase text as formal, casual and concise (`-` reads stdin).
    Rephrase {
        text: String,
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Get a short motivational quote for a mood.
    Quote {
        mood: String,
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Show the stored conversation of a session.
    History {
        /// Session identifier.
        #[arg(long, default_value = "default")]
        session: String,
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Send a chat message, continuing the session's stored conversation.
    Chat {
        /// Message to send.
        message: String,

        /// Session identifier.
        #[arg(long, default_value = "default")]
        session: String,

        /// Wait for the whole reply instead of streaming it.
        #[arg(long)]
        no_stream: bool,

        #[command(flatten)]
        server: ServerArgs,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Commands {
    /// Whether this command runs the server (and should log at info by default).
    pub fn is_server(&self) -> bool {
        matches!(self, Commands::Serve { .. })
    }
}

/// Read a positional argument, taking stdin when it is `-`.
pub fn read_input(arg: String) -> anyhow::Result<String> {
    if arg != "-" {
        return Ok(arg);
    }
    let mut buf = String::new();
    std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
    Ok(buf)
}
