//! Bounded, append-only message retention.

pub mod log;

pub use log::{Delivery, MessageLog};
