//! JSON document storage.

pub mod state;

pub use state::JsonStateRepository;
