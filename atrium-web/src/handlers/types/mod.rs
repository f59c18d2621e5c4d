//! Type definitions for handlers
//!
//! This module contains all the request/response types used by the handlers.

pub mod affiliates;
pub mod common;
pub mod users;
pub mod workshops;

// Re-export all types for convenience
pub use affiliates::*;
pub use common::*;
pub use users::*;
pub use workshops::*;
