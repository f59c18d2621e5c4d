//! Atrium Core - shared error, configuration and logging infrastructure
//!
//! This crate defines the pieces every other Atrium crate leans on: the
//! unified error type, the configuration model, and logging setup.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
