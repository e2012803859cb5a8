//! Application state wiring the chat session to its persistence.
//!
//! The session service is generic over its credential generator and the
//! bridge over its repository; AppState pins them to the concrete
//! implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use storm_core::identity::RandomGenerator;
use storm_core::persistence::PersistenceBridge;
use storm_core::session::SessionService;
use storm_infra::json::JsonStateRepository;
use storm_types::config::ChatConfig;

pub type ConcreteSessionService = SessionService<RandomGenerator>;

pub type ConcreteBridge = PersistenceBridge<JsonStateRepository>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<ConcreteSessionService>,
    pub bridge: Arc<ConcreteBridge>,
    pub data_dir: PathBuf,
}

impl AppState {
    pub fn new(session: ConcreteSessionService, bridge: ConcreteBridge, data_dir: PathBuf) -> Self {
        Self {
            session: Arc::new(session),
            bridge: Arc::new(bridge),
            data_dir,
        }
    }

    /// Restore saved chat state from `data_dir` (unless amnesia is on) and
    /// wire the session service around it.
    pub async fn init(data_dir: PathBuf, config: ChatConfig) -> anyhow::Result<Self> {
        let repo = JsonStateRepository::from_config(&data_dir, &config);
        let bridge = PersistenceBridge::new(repo, config.clone());

        let (identities, messages) = bridge
            .load()
            .await
            .with_context(|| format!("failed to restore chat state from {}", data_dir.display()))?;

        tracing::info!(
            users = identities.len(),
            messages = messages.len(),
            persistence = bridge.is_enabled(),
            "Chat state ready"
        );

        let session = SessionService::new(config, identities, messages);
        Ok(Self::new(session, bridge, data_dir))
    }

    /// Save the live state through the bridge. A no-op under amnesia.
    pub async fn persist(&self) -> anyhow::Result<()> {
        self.session
            .persist(self.bridge.as_ref())
            .await
            .context("failed to save chat state")
    }
}
