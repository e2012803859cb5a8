//! The `serve` command: restore state, run the chat server until a shutdown
//! signal, then save state.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use storm_infra::config::enforce_floors;
use storm_types::config::ChatConfig;
use storm_types::user::IdentityMode;

use crate::http::router::build_router;
use crate::state::AppState;

/// Command-line overrides applied on top of `config.toml`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServeOverrides {
    pub amnesia: bool,
    pub persist: bool,
    pub mode: Option<IdentityMode>,
}

impl ServeOverrides {
    pub fn apply(self, mut config: ChatConfig) -> ChatConfig {
        if self.amnesia {
            config.amnesia = true;
        } else if self.persist {
            config.amnesia = false;
        }
        if let Some(mode) = self.mode {
            config.identity_mode = mode;
        }
        enforce_floors(config)
    }
}

/// Run the chat server on `host:port` until Ctrl+C or SIGTERM.
pub async fn serve(data_dir: PathBuf, config: ChatConfig, host: &str, port: u16, quiet: bool) -> Result<()> {
    let mode = config.identity_mode;
    let amnesia = config.amnesia;
    let state = AppState::init(data_dir, config).await?;

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    if !quiet {
        println!(
            "  {} storm listening on {} ({} mode{})",
            style("⚡").bold(),
            style(format!("http://{addr}")).cyan(),
            mode,
            if amnesia { ", amnesia" } else { "" }
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
    }

    let router = build_router(state.clone());

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.persist().await?;
    if state.bridge.is_enabled() {
        tracing::info!(data_dir = %state.data_dir.display(), "Chat state saved");
    }

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overrides_keeps_file_config() {
        let config = ChatConfig {
            amnesia: false,
            identity_mode: IdentityMode::Address,
            ..ChatConfig::default()
        };
        assert_eq!(ServeOverrides::default().apply(config.clone()), config);
    }

    #[test]
    fn test_persist_and_mode_override() {
        let overrides = ServeOverrides {
            persist: true,
            mode: Some(IdentityMode::Address),
            ..ServeOverrides::default()
        };
        let config = overrides.apply(ChatConfig::default());
        assert!(!config.amnesia);
        assert_eq!(config.identity_mode, IdentityMode::Address);
    }

    #[test]
    fn test_amnesia_override_wins() {
        let config = ChatConfig {
            amnesia: false,
            ..ChatConfig::default()
        };
        let overrides = ServeOverrides {
            amnesia: true,
            ..ServeOverrides::default()
        };
        assert!(overrides.apply(config).amnesia);
    }
}
