//! storm chat server entry point.
//!
//! Binary name: `stormd`
//!
//! Parses CLI arguments, initializes tracing and configuration, then
//! dispatches to the server or the status command.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::serve::ServeOverrides;
use cli::{Cli, Commands};
use storm_infra::config::load_config;
use storm_infra::filesystem::resolve_data_dir;
use storm_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    init_tracing(verbosity_filter(cli.verbose, cli.quiet), otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "stormd", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);
    let file_config = load_config(&data_dir).await;

    let result = match cli.command {
        Commands::Serve {
            port,
            host,
            amnesia,
            persist,
            mode,
            otel: _,
        } => {
            let config = ServeOverrides {
                amnesia,
                persist,
                mode,
            }
            .apply(file_config);
            cli::serve::serve(data_dir, config, &host, port, cli.quiet).await
        }

        Commands::Status => cli::status::status(&data_dir, &file_config, cli.json).await,

        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
