//! Session protocol and state stores for storm.
//!
//! This crate holds the chat state (identity store and message log), the
//! request-level session protocol that guards it, and the "ports"
//! (repository traits) that the infrastructure layer implements. It depends
//! only on `storm-types` -- never on `storm-infra` or any IO crate.

pub mod identity;
pub mod message;
pub mod persistence;
pub mod repository;
pub mod session;
