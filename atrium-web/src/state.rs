//! Application state: the long-lived service handles behind every request

use crate::{WebConfig, WebError, WebResult};
use std::sync::Arc;
use tracing::{debug, info};

use atrium_auth::{
    AccessGate, AuthorizationApi, AuthzClientConfig, AuthzRpcClient, ElevationConfig,
    ElevationGate, GateConfig, SessionStore,
};
use atrium_salesforce::{CrmApi, SalesforceApiConfig, SalesforceClient};

/// Shared application state
///
/// The authorization and CRM clients are built once at startup and reused
/// for every request; they are dropped when the process shuts down.
#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: WebConfig,
    /// Remote authorization client
    pub authz: Arc<dyn AuthorizationApi>,
    /// Salesforce CRM client
    pub crm: Arc<dyn CrmApi>,
    /// In-memory session store
    pub sessions: Arc<SessionStore>,
    /// Access decision gate
    pub access_gate: Arc<AccessGate>,
    /// Role elevation gate
    pub elevation_gate: Arc<ElevationGate>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: WebConfig) -> WebResult<Self> {
        let auth = &config.core.auth;

        let mut authz_config = AuthzClientConfig::new(auth.base_url.clone());
        if let Some(timeout) = auth.request_timeout_seconds {
            authz_config = authz_config.with_timeout(timeout);
        }

        let authz: Arc<dyn AuthorizationApi> = Arc::new(
            AuthzRpcClient::new(authz_config)
                .map_err(|e| WebError::Config(format!("Failed to create authz client: {}", e)))?,
        );

        let crm: Arc<dyn CrmApi> = Arc::new(
            SalesforceClient::new(SalesforceApiConfig::from_settings(&config.core.crm)).map_err(
                |e| WebError::Config(format!("Failed to create Salesforce client: {}", e)),
            )?,
        );

        let sessions = Arc::new(SessionStore::new(config.core.session.timeout_minutes));

        let access_gate = Arc::new(AccessGate::new(
            authz.clone(),
            GateConfig {
                auto_bootstrap: auth.auto_bootstrap,
                default_scope: auth.default_scope.clone(),
                bootstrap_user_id: auth.bootstrap_user_id,
            },
        ));

        let elevation_gate = Arc::new(ElevationGate::new(ElevationConfig {
            mode: auth.mode,
            bypass_token: auth.bypass_token.clone(),
            default_scope: auth.default_scope.clone(),
        }));

        info!(mode = %auth.mode, "Application state initialized");

        Ok(Self {
            config,
            authz,
            crm,
            sessions,
            access_gate,
            elevation_gate,
        })
    }

    /// Remove sessions that exceeded the inactivity timeout
    pub async fn purge_stale_sessions(&self) {
        let purged = self.sessions.purge_stale().await;
        if purged > 0 {
            debug!(purged, "Purged stale sessions");
        }
    }
}
