//! Request-level session protocol: registration, posting, polling, renaming.

mod request;
pub mod service;

pub use service::{Caller, ChatStats, Registration, SessionService, SubmitOutcome};
