//! Shared domain types for storm.
//!
//! This crate contains the domain types used across the storm chat server:
//! users, messages, their public views, persisted records, configuration,
//! and the error types shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod record;
pub mod user;
