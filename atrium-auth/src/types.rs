//! Gate-facing data types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role granted by the elevation gate
pub const AFFILIATE_MANAGER_ROLE: &str = "Affiliate Manager";

/// Header carrying the opaque identity token used in access checks
pub const X_JWT: &str = "x-jwt";
/// Header carrying the identity used for permission lookup
pub const X_EMAIL: &str = "x-email";
/// Headers used only by the elevation bypass path
pub const X_AFFILIATE: &str = "x-affiliate";
pub const X_USER_ID: &str = "x-user-id";
pub const X_ROLE_NAME: &str = "x-role-name";
pub const X_BYPASS_TOKEN: &str = "x-bypass-token";

/// Privilege tier required for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    /// Integer tier sent to the remote permission service
    pub fn as_wire(&self) -> u8 {
        match self {
            AccessLevel::Read => 1,
            AccessLevel::Write => 2,
            AccessLevel::Admin => 3,
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessLevel::Read => write!(f, "read"),
            AccessLevel::Write => write!(f, "write"),
            AccessLevel::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(AccessLevel::Read),
            "write" => Ok(AccessLevel::Write),
            "admin" => Ok(AccessLevel::Admin),
            _ => Err(format!("Unknown access level: {}", s)),
        }
    }
}

/// A single entry in a session's permission list
///
/// Order is irrelevant and duplicates are not deduplicated at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub resource: String,
}

impl PermissionEntry {
    pub fn new<S: Into<String>>(resource: S) -> Self {
        Self {
            resource: resource.into(),
        }
    }
}

/// The slice of an incoming request the gates read
///
/// Header names are lowercased at construction so lookups are
/// case-insensitive regardless of the transport.
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
}

impl GateRequest {
    pub fn new<M: Into<String>, P: Into<String>>(
        method: M,
        path: P,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
        }
    }

    /// Look up a header value (names are stored lowercase)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// Per-route authorization policy
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    /// Required privilege tier
    pub level: AccessLevel,
    /// Explicit resource identifier override (may contain the affiliate placeholder)
    pub resource: Option<String>,
}

impl AccessPolicy {
    pub fn new(level: AccessLevel) -> Self {
        Self {
            level,
            resource: None,
        }
    }

    pub fn with_resource<S: Into<String>>(mut self, resource: S) -> Self {
        self.resource = Some(resource.into());
        self
    }
}
