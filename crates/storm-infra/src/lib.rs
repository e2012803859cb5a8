//! Infrastructure layer for storm.
//!
//! Contains implementations of the repository traits defined in `storm-core`
//! (JSON state files) plus configuration loading and data directory
//! resolution.

pub mod config;
pub mod filesystem;
pub mod json;
