//! CredentialGenerator trait for nicknames and tokens.
//!
//! The identity store draws candidate nicknames and tokens through this
//! trait so tests can script collisions. `RandomGenerator` is the
//! production implementation.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Source of random credential strings.
pub trait CredentialGenerator: Send + Sync {
    /// Produce a candidate string of exactly `len` characters.
    fn generate(&self, len: usize) -> String;
}

/// Draws uniformly from ASCII letters and digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl CredentialGenerator for RandomGenerator {
    fn generate(&self, len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}
