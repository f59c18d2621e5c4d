//! Core data type definitions

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Atrium system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtriumConfig {
    pub auth: AuthzSettings,
    pub crm: CrmSettings,
    pub session: SessionSettings,
}

/// Settings for the remote authorization service and the access gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthzSettings {
    /// Base URL of the remote permission service
    pub base_url: String,
    /// Authorization mode (production disables the elevation bypass)
    pub mode: AuthMode,
    /// Bypass token accepted by the elevation gate outside production
    pub bypass_token: Option<String>,
    /// Allow the one-time auto-allow path for sessions without an affiliate scope
    pub auto_bootstrap: bool,
    /// Scope assigned when a session is bootstrapped or elevated without a header
    pub default_scope: String,
    /// User id assigned when a session is bootstrapped
    pub bootstrap_user_id: i64,
    /// Request timeout for authorization calls (None = wait indefinitely)
    pub request_timeout_seconds: Option<u64>,
}

/// Settings for the Salesforce CRM client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmSettings {
    /// OAuth login URL (e.g. https://login.salesforce.com)
    pub login_url: String,
    /// REST API version (e.g. "v59.0")
    pub api_version: String,
    /// Connected app client id
    pub client_id: String,
    /// Connected app client secret
    pub client_secret: String,
    /// Integration user name
    pub username: String,
    /// Integration user password (with security token appended)
    pub password: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Settings for the in-memory session store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Cookie carrying the session id
    pub cookie_name: String,
    /// Minutes of inactivity before a session is considered stale
    pub timeout_minutes: u32,
    /// Interval between stale-session purge runs
    pub cleanup_interval_seconds: u64,
}

/// Authorization mode - explicit tagged variant, never inferred ambiently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Production mode: the header-driven elevation bypass is disabled
    Production,
    /// Development mode: the elevation bypass token is honored
    Development,
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMode::Production => write!(f, "production"),
            AuthMode::Development => write!(f, "development"),
        }
    }
}

impl std::str::FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(AuthMode::Production),
            "development" => Ok(AuthMode::Development),
            _ => Err(format!("Unknown auth mode: {}", s)),
        }
    }
}
