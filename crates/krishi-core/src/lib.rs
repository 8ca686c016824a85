//! Core types, configuration, and errors shared across the Krishi crates.

pub mod config;
pub mod error;
pub mod types;

pub use config::KrishiConfig;
pub use error::{KrishiError, Result};
pub use types::Season;
