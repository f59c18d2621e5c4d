//! Common types used across multiple handlers

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Response for a successfully created record
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Salesforce id of the new record
    #[schema(example = "a0B5g000001AbCdEAK")]
    pub id: String,
}

/// Response for a successful in-place update
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedResponse {
    #[schema(example = "updated")]
    pub status: String,
}

impl UpdatedResponse {
    pub fn new() -> Self {
        Self {
            status: "updated".to_string(),
        }
    }
}

impl Default for UpdatedResponse {
    fn default() -> Self {
        Self::new()
    }
}
