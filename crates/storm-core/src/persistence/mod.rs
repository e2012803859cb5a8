//! Translation between live chat state and its persisted records.

pub mod bridge;

pub use bridge::PersistenceBridge;
