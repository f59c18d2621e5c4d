//! Configuration management

use crate::error::{AtriumError, AtriumResult, ErrorContext};
use crate::types::{AtriumConfig, AuthMode};

use std::path::Path;
use std::str::FromStr;

impl Default for AtriumConfig {
    fn default() -> Self {
        Self {
            auth: crate::types::AuthzSettings {
                base_url: "http://127.0.0.1:6800".to_string(),
                mode: AuthMode::Production,
                bypass_token: None,
                auto_bootstrap: true,
                default_scope: "ALL".to_string(),
                bootstrap_user_id: 1,
                request_timeout_seconds: None,
            },
            crm: crate::types::CrmSettings {
                login_url: "https://login.salesforce.com".to_string(),
                api_version: "v59.0".to_string(),
                client_id: String::new(),
                client_secret: String::new(),
                username: String::new(),
                password: String::new(),
                timeout_seconds: 30,
            },
            session: crate::types::SessionSettings {
                cookie_name: "atrium_sid".to_string(),
                timeout_minutes: 480, // 8 hours
                cleanup_interval_seconds: 3600,
            },
        }
    }
}

impl AtriumConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AtriumResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(AtriumError::Config {
                message: format!("Failed to read config file: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("read_file")
                    .with_suggestion("Check if the config file exists and is readable"),
            })
        })?;

        let config: AtriumConfig = toml::from_str(&content).map_err(|e| {
            Box::new(AtriumError::Config {
                message: format!("Failed to parse config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("parse_toml")
                    .with_suggestion("Check TOML syntax in config file"),
            })
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> AtriumResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            Box::new(AtriumError::Config {
                message: format!("Failed to serialize config: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config").with_operation("serialize_toml"),
            })
        })?;

        std::fs::write(path, content).map_err(|e| {
            Box::new(AtriumError::Config {
                message: format!("Failed to write config file: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("config")
                    .with_operation("write_file")
                    .with_suggestion("Check if the directory exists and is writable"),
            })
        })?;

        Ok(())
    }

    /// Apply ATRIUM_* / SF_* environment variables on top of the current values
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("ATRIUM_AUTHZ_URL") {
            self.auth.base_url = url;
        }
        if let Ok(mode) = std::env::var("ATRIUM_AUTH_MODE") {
            if let Ok(mode) = AuthMode::from_str(&mode) {
                self.auth.mode = mode;
            }
        }
        if let Ok(token) = std::env::var("ATRIUM_BYPASS_TOKEN") {
            self.auth.bypass_token = Some(token);
        }
        if let Ok(value) = std::env::var("ATRIUM_AUTO_BOOTSTRAP") {
            if let Ok(flag) = value.parse() {
                self.auth.auto_bootstrap = flag;
            }
        }
        if let Ok(url) = std::env::var("SF_LOGIN_URL") {
            self.crm.login_url = url;
        }
        if let Ok(client_id) = std::env::var("SF_CLIENT_ID") {
            self.crm.client_id = client_id;
        }
        if let Ok(client_secret) = std::env::var("SF_CLIENT_SECRET") {
            self.crm.client_secret = client_secret;
        }
        if let Ok(username) = std::env::var("SF_USERNAME") {
            self.crm.username = username;
        }
        if let Ok(password) = std::env::var("SF_PASSWORD") {
            self.crm.password = password;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> AtriumResult<()> {
        if url::Url::parse(&self.auth.base_url).is_err() {
            return Err(Box::new(AtriumError::Config {
                message: format!("Invalid authorization base URL: {}", self.auth.base_url),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set auth.base_url to a valid http(s) URL"),
            }));
        }

        if url::Url::parse(&self.crm.login_url).is_err() {
            return Err(Box::new(AtriumError::Config {
                message: format!("Invalid Salesforce login URL: {}", self.crm.login_url),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set crm.login_url to a valid http(s) URL"),
            }));
        }

        if self.auth.mode == AuthMode::Production && self.auth.bypass_token.is_some() {
            return Err(Box::new(AtriumError::Config {
                message: "bypass_token is not honored in production mode".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Remove auth.bypass_token or switch auth.mode to development"),
            }));
        }

        if self.auth.default_scope.is_empty() {
            return Err(Box::new(AtriumError::Config {
                message: "default_scope must not be empty".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set auth.default_scope (the shipped default is \"ALL\")"),
            }));
        }

        if self.crm.timeout_seconds == 0 {
            return Err(Box::new(AtriumError::Config {
                message: "CRM timeout_seconds must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set crm.timeout_seconds to a positive value"),
            }));
        }

        if self.session.timeout_minutes == 0 {
            return Err(Box::new(AtriumError::Config {
                message: "Session timeout_minutes must be greater than 0".to_string(),
                source: None,
                context: ErrorContext::new("config")
                    .with_operation("validate")
                    .with_suggestion("Set session.timeout_minutes to a positive value"),
            }));
        }

        Ok(())
    }
}
