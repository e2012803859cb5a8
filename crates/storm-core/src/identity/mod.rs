//! Registered users and the credentials issued to them.

pub mod generator;
pub mod store;

pub use generator::{CredentialGenerator, RandomGenerator};
pub use store::IdentityStore;
