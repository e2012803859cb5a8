//! Repository trait definitions (ports) for storm.
//!
//! These traits define the persistence interface that storm-core depends on.
//! Concrete implementations live in storm-infra.

pub mod state;
