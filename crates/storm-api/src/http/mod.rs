//! HTTP API layer for storm.
//!
//! Axum-based chat endpoints with bearer-token or address identification
//! and a `{status, reason, data}` envelope on every response.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
