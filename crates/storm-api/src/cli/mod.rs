//! CLI command definitions for the `stormd` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod serve;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use storm_types::user::IdentityMode;

/// Run a polling group-chat server.
#[derive(Parser)]
#[command(name = "stormd", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding config.toml and saved state.
    #[arg(long, global = true, env = "STORM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Keep state in memory only, overriding config.toml.
        #[arg(long, conflicts_with = "persist")]
        amnesia: bool,

        /// Load state on start and save it on shutdown, overriding config.toml.
        #[arg(long)]
        persist: bool,

        /// How callers are identified: token or address.
        #[arg(long)]
        mode: Option<IdentityMode>,

        /// Export traces to stdout via OpenTelemetry.
        #[arg(long)]
        otel: bool,
    },

    /// Show configuration and saved state.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
