//! Remote authorization client
//!
//! The external permission service exposes exactly two operations: a boolean
//! access check and a permission-list lookup. The client handle is built once
//! at startup and reused for every call; there is no retry, no caching, and
//! no circuit breaking at this layer.

use async_trait::async_trait;
use atrium_core::{AtriumError, AtriumResult, ErrorContext};
use serde::Serialize;
use tracing::debug;

use crate::types::{AccessLevel, PermissionEntry};

/// The two operations of the remote permission service
#[async_trait]
pub trait AuthorizationApi: Send + Sync {
    /// May this token access this resource at this level?
    async fn can_access(
        &self,
        token: &str,
        resource: &str,
        level: AccessLevel,
    ) -> AtriumResult<bool>;

    /// What permissions does this identity have?
    ///
    /// Returns `Ok(None)` when the remote replies with a non-sequence value;
    /// transport and protocol failures are errors.
    async fn get_permissions(&self, email: &str) -> AtriumResult<Option<Vec<PermissionEntry>>>;
}

/// Configuration for the authorization client
#[derive(Debug, Clone)]
pub struct AuthzClientConfig {
    /// Base URL of the permission service
    pub base_url: String,
    /// Request timeout in seconds (None = wait indefinitely)
    pub timeout_seconds: Option<u64>,
    /// User agent string
    pub user_agent: String,
}

impl Default for AuthzClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_seconds: None,
            user_agent: "atrium/1.0".to_string(),
        }
    }
}

impl AuthzClientConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }
}

#[derive(Debug, Serialize)]
struct CanAccessRequest<'a> {
    token: &'a str,
    resource: &'a str,
    level: u8,
}

#[derive(Debug, Serialize)]
struct GetPermissionsRequest<'a> {
    email: &'a str,
}

/// HTTP implementation of [`AuthorizationApi`]
pub struct AuthzRpcClient {
    client: reqwest::Client,
    config: AuthzClientConfig,
}

impl AuthzRpcClient {
    /// Create a new client with a long-lived connection pool
    pub fn new(config: AuthzClientConfig) -> AtriumResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());

        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }

        let client = builder.build().map_err(|e| {
            Box::new(AtriumError::Authorization {
                message: format!("Failed to create authorization client: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("authz_client").with_operation("create_client"),
            })
        })?;

        Ok(Self { client, config })
    }

    fn command_url(&self, command: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            command
        )
    }

    async fn post_command<B: Serialize>(
        &self,
        command: &str,
        body: &B,
    ) -> AtriumResult<reqwest::Response> {
        let url = self.command_url(command);
        debug!(command, url = %url, "Issuing authorization command");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                Box::new(AtriumError::Network {
                    message: format!("Authorization service request failed: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("authz_client")
                        .with_operation(command)
                        .with_suggestion("Check that the authorization service is reachable"),
                })
            })?;

        if !response.status().is_success() {
            return Err(Box::new(handle_response_error(response, command).await));
        }

        Ok(response)
    }
}

#[async_trait]
impl AuthorizationApi for AuthzRpcClient {
    async fn can_access(
        &self,
        token: &str,
        resource: &str,
        level: AccessLevel,
    ) -> AtriumResult<bool> {
        let body = CanAccessRequest {
            token,
            resource,
            level: level.as_wire(),
        };

        let response = self.post_command("canAccess", &body).await?;

        let allowed: bool = response.json().await.map_err(|e| {
            Box::new(AtriumError::Authorization {
                message: format!("Failed to parse canAccess response: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("authz_client")
                    .with_operation("canAccess")
                    .with_suggestion("The service must reply with a JSON boolean"),
            })
        })?;

        debug!(resource, level = %level, allowed, "canAccess resolved");
        Ok(allowed)
    }

    async fn get_permissions(&self, email: &str) -> AtriumResult<Option<Vec<PermissionEntry>>> {
        let body = GetPermissionsRequest { email };

        let response = self.post_command("getPermissions", &body).await?;

        let value: serde_json::Value = response.json().await.map_err(|e| {
            Box::new(AtriumError::Authorization {
                message: format!("Failed to parse getPermissions response: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("authz_client").with_operation("getPermissions"),
            })
        })?;

        // Anything other than a JSON array is a "non-sequence" reply,
        // which the caller treats as a denial
        if !value.is_array() {
            debug!(email, "getPermissions returned a non-sequence");
            return Ok(None);
        }

        let entries: Vec<PermissionEntry> = serde_json::from_value(value).map_err(|e| {
            Box::new(AtriumError::Authorization {
                message: format!("Malformed permission entries: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("authz_client")
                    .with_operation("getPermissions")
                    .with_suggestion("Entries must be objects with a resource field"),
            })
        })?;

        debug!(email, count = entries.len(), "getPermissions resolved");
        Ok(Some(entries))
    }
}

/// Helper to turn a failed HTTP response into an error with context
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> AtriumError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    AtriumError::Authorization {
        message: format!(
            "HTTP {} error for {}: {}",
            status.as_u16(),
            url,
            if error_body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                &error_body
            }
        ),
        source: None,
        context: ErrorContext::new("authz_client")
            .with_operation(operation)
            .with_suggestion("Check the authorization service logs"),
    }
}
