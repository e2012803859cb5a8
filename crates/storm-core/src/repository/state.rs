//! StateRepository trait definition.
//!
//! Loads and saves the whole chat state as one `ChatSnapshot`. Called only
//! at process boundaries, never while requests are being served.

use storm_types::error::RepositoryError;
use storm_types::record::ChatSnapshot;

/// Repository trait for chat state persistence.
///
/// Implementations live in storm-infra (e.g., `JsonStateRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait StateRepository: Send + Sync {
    /// Load the previously saved state, or `None` when nothing was saved.
    fn load(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<ChatSnapshot>, RepositoryError>> + Send;

    /// Replace the saved state with `snapshot`.
    fn save(
        &self,
        snapshot: &ChatSnapshot,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
