//! Role elevation gate
//!
//! Grants the "Affiliate Manager" role when a configured bypass token is
//! presented outside production, or when the session already carries the
//! role. Pure local logic; no remote call. The bypass is a trust boundary
//! driven entirely by client-supplied headers, so it is only honored when
//! the auth mode is explicitly not production.

use tracing::{debug, warn};

use atrium_core::AuthMode;

use crate::gate::AccessDecision;
use crate::session::Session;
use crate::types::{
    GateRequest, AFFILIATE_MANAGER_ROLE, X_AFFILIATE, X_BYPASS_TOKEN, X_ROLE_NAME, X_USER_ID,
};

/// Elevation gate configuration
#[derive(Debug, Clone)]
pub struct ElevationConfig {
    pub mode: AuthMode,
    pub bypass_token: Option<String>,
    /// Scope assigned when no affiliate header is supplied
    pub default_scope: String,
}

impl ElevationConfig {
    pub fn new(mode: AuthMode, bypass_token: Option<String>) -> Self {
        Self {
            mode,
            bypass_token,
            default_scope: "ALL".to_string(),
        }
    }
}

/// Header-driven role elevation gate
pub struct ElevationGate {
    config: ElevationConfig,
}

impl ElevationGate {
    pub fn new(config: ElevationConfig) -> Self {
        Self { config }
    }

    fn bypass_token_matches(&self, request: &GateRequest) -> bool {
        if self.config.mode == AuthMode::Production {
            return false;
        }

        match (&self.config.bypass_token, request.header(X_BYPASS_TOKEN)) {
            (Some(configured), Some(presented)) => configured == presented,
            _ => false,
        }
    }

    /// Grant the elevated role, or deny
    ///
    /// On grant the session's affiliate scope is set from the header or the
    /// default, and a user is synthesized from headers when none exists yet.
    pub fn elevate(&self, request: &GateRequest, session: &mut Session) -> AccessDecision {
        let bypass = self.bypass_token_matches(request);
        let already_elevated = session.has_role(AFFILIATE_MANAGER_ROLE);

        if !bypass && !already_elevated {
            debug!(session_id = %session.id, "Elevation denied");
            return AccessDecision::denied("Role elevation denied");
        }

        if bypass {
            warn!(
                session_id = %session.id,
                mode = %self.config.mode,
                "Granting elevated role via bypass token"
            );
        }

        session.affiliate = Some(
            request
                .header(X_AFFILIATE)
                .map(str::to_string)
                .unwrap_or_else(|| self.config.default_scope.clone()),
        );

        if session.user_id.is_none() {
            // Synthesize a user from headers with empty permission lists
            if let Some(user_id) = request.header(X_USER_ID).and_then(|v| v.parse().ok()) {
                session.user_id = Some(user_id);
            }
            if let Some(role) = request.header(X_ROLE_NAME) {
                session.grant_role(role);
            }
            session.permissions.clear();
        }

        session.grant_role(AFFILIATE_MANAGER_ROLE);

        AccessDecision::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn gate(mode: AuthMode) -> ElevationGate {
        ElevationGate::new(ElevationConfig::new(mode, Some("letmein".to_string())))
    }

    fn request(headers: &[(&str, &str)]) -> GateRequest {
        let headers: HashMap<String, String> = headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GateRequest::new("POST", "/affiliates", headers)
    }

    #[test]
    fn test_bypass_grants_outside_production() {
        let gate = gate(AuthMode::Development);
        let mut session = Session::new();

        let decision = gate.elevate(
            &request(&[("x-bypass-token", "letmein"), ("x-affiliate", "ACME")]),
            &mut session,
        );

        assert!(decision.is_allowed());
        assert!(session.has_role(AFFILIATE_MANAGER_ROLE));
        assert_eq!(session.affiliate.as_deref(), Some("ACME"));
    }

    #[test]
    fn test_bypass_defaults_scope_to_all() {
        let gate = gate(AuthMode::Development);
        let mut session = Session::new();

        let decision = gate.elevate(&request(&[("x-bypass-token", "letmein")]), &mut session);

        assert!(decision.is_allowed());
        assert_eq!(session.affiliate.as_deref(), Some("ALL"));
    }

    #[test]
    fn test_bypass_ignored_in_production() {
        let gate = gate(AuthMode::Production);
        let mut session = Session::new();

        let decision = gate.elevate(&request(&[("x-bypass-token", "letmein")]), &mut session);

        assert!(!decision.is_allowed());
        assert!(!session.has_role(AFFILIATE_MANAGER_ROLE));
    }

    #[test]
    fn test_wrong_token_denied() {
        let gate = gate(AuthMode::Development);
        let mut session = Session::new();

        let decision = gate.elevate(&request(&[("x-bypass-token", "nope")]), &mut session);

        assert!(!decision.is_allowed());
    }

    #[test]
    fn test_existing_role_grants_without_token() {
        let gate = gate(AuthMode::Production);
        let mut session = Session::new();
        session.grant_role(AFFILIATE_MANAGER_ROLE);

        let decision = gate.elevate(&request(&[("x-affiliate", "ACME")]), &mut session);

        assert!(decision.is_allowed());
        assert_eq!(session.affiliate.as_deref(), Some("ACME"));
    }

    #[test]
    fn test_synthesizes_user_from_headers() {
        let gate = gate(AuthMode::Development);
        let mut session = Session::new();

        gate.elevate(
            &request(&[
                ("x-bypass-token", "letmein"),
                ("x-user-id", "42"),
                ("x-role-name", "Coordinator"),
            ]),
            &mut session,
        );

        assert_eq!(session.user_id, Some(42));
        assert!(session.has_role("Coordinator"));
        assert!(session.has_role(AFFILIATE_MANAGER_ROLE));
        assert!(session.permissions.is_empty());
    }

    #[test]
    fn test_invalid_user_id_header_is_ignored() {
        let gate = gate(AuthMode::Development);
        let mut session = Session::new();

        let decision = gate.elevate(
            &request(&[("x-bypass-token", "letmein"), ("x-user-id", "not-a-number")]),
            &mut session,
        );

        assert!(decision.is_allowed());
        assert!(session.user_id.is_none());
    }

    #[test]
    fn test_existing_user_is_not_overwritten() {
        let gate = gate(AuthMode::Development);
        let mut session = Session::new();
        session.user_id = Some(7);
        session.permissions = vec![crate::types::PermissionEntry::new("/workshops/1")];

        gate.elevate(
            &request(&[("x-bypass-token", "letmein"), ("x-user-id", "42")]),
            &mut session,
        );

        assert_eq!(session.user_id, Some(7));
        assert_eq!(session.permissions.len(), 1);
    }
}
