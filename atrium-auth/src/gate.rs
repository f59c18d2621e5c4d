//! Access decision gate and session augmentation
//!
//! The gate decides whether a request may proceed: a one-time bootstrap path
//! for sessions without an affiliate marker, then a remote `canAccess` check
//! against the resolved resource identifier.

use std::sync::Arc;
use tracing::{debug, warn};

use atrium_core::AtriumResult;

use crate::client::AuthorizationApi;
use crate::resource;
use crate::session::Session;
use crate::types::{AccessPolicy, GateRequest, X_EMAIL, X_JWT};

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied { message: String },
}

impl AccessDecision {
    pub fn denied<S: Into<String>>(message: S) -> Self {
        AccessDecision::Denied {
            message: message.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }
}

/// Gate configuration
///
/// The auto-allow bootstrap is an explicit flag: when a session carries no
/// affiliate marker and the flag is on, the first request is allowed without
/// a remote check and the session is stamped with the default scope and user.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub auto_bootstrap: bool,
    pub default_scope: String,
    pub bootstrap_user_id: i64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auto_bootstrap: true,
            default_scope: "ALL".to_string(),
            bootstrap_user_id: 1,
        }
    }
}

/// Per-request access gate backed by the remote authorization service
pub struct AccessGate {
    authz: Arc<dyn AuthorizationApi>,
    config: GateConfig,
}

impl AccessGate {
    pub fn new(authz: Arc<dyn AuthorizationApi>, config: GateConfig) -> Self {
        Self { authz, config }
    }

    /// Decide whether the request may proceed
    ///
    /// Remote failures propagate as errors; the caller routes them into the
    /// framework's generic error path. Denials are terminal for the request.
    pub async fn authorize(
        &self,
        request: &GateRequest,
        session: &mut Session,
        policy: &AccessPolicy,
    ) -> AtriumResult<AccessDecision> {
        if session.affiliate.is_none() {
            if self.config.auto_bootstrap {
                // One-time escalation path: stamp the session and allow
                session.affiliate = Some(self.config.default_scope.clone());
                session.user_id = Some(self.config.bootstrap_user_id);

                warn!(
                    session_id = %session.id,
                    scope = %self.config.default_scope,
                    "Bootstrapped session without affiliate marker; allowing request"
                );
                return Ok(AccessDecision::Allowed);
            }

            debug!(session_id = %session.id, "Session has no affiliate scope");
            return Ok(AccessDecision::denied("No affiliate scope established"));
        }

        let resource = resource::resolve(
            policy.resource.as_deref(),
            &request.method,
            &request.path,
            session.affiliate.as_deref(),
        );

        // Presence check is the only input sanitation performed here
        let token = match request.header(X_JWT) {
            Some(token) if !token.is_empty() => token,
            _ => {
                debug!(resource = %resource, "Missing identity token");
                return Ok(AccessDecision::denied("Missing identity token"));
            }
        };

        let allowed = self.authz.can_access(token, &resource, policy.level).await?;

        if allowed {
            debug!(resource = %resource, level = %policy.level, "Access granted");
            Ok(AccessDecision::Allowed)
        } else {
            debug!(resource = %resource, level = %policy.level, "Access denied");
            Ok(AccessDecision::denied(format!(
                "Not authorized for {}",
                resource
            )))
        }
    }

    /// Fetch the caller's permission list and store it on the session
    ///
    /// Binary outcome: a proper sequence is stored and the chain continues;
    /// anything else, including a failed remote call, is a denial.
    pub async fn attach_permissions(
        &self,
        request: &GateRequest,
        session: &mut Session,
    ) -> AccessDecision {
        let email = match request.header(X_EMAIL) {
            Some(email) if !email.is_empty() => email,
            _ => {
                debug!("Missing email header for permission fetch");
                return AccessDecision::denied("Missing email header");
            }
        };

        match self.authz.get_permissions(email).await {
            Ok(Some(entries)) => {
                debug!(email, count = entries.len(), "Attached permissions to session");
                session.permissions = entries;
                AccessDecision::Allowed
            }
            Ok(None) => {
                debug!(email, "Permission fetch returned a non-sequence");
                AccessDecision::denied("No permissions available")
            }
            Err(e) => {
                warn!(email, error = %e, "Permission fetch failed");
                AccessDecision::denied("No permissions available")
            }
        }
    }
}
