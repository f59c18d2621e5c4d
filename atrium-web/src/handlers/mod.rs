//! HTTP request handlers for the Atrium web server
//!
//! This module contains all the HTTP request handlers organized by resource.

pub mod affiliates;
pub mod health;
pub mod types;
pub mod users;
pub mod workshops;

// Re-export all handler functions
pub use affiliates::*;
pub use health::*;
pub use users::*;
pub use workshops::*;

// Re-export all types for convenience
pub use types::*;
