//! CRM API trait and client configuration

use async_trait::async_trait;
use atrium_core::{AtriumError, AtriumResult, ErrorContext};

use crate::records::{
    Affiliate, AffiliatePatch, CrmUser, Facilitator, NewAffiliate, NewWorkshop, Workshop,
    WorkshopPatch,
};

/// Configuration for the Salesforce client
#[derive(Debug, Clone)]
pub struct SalesforceApiConfig {
    /// OAuth login URL
    pub login_url: String,
    /// REST API version, e.g. "v59.0"
    pub api_version: String,
    /// Connected app credentials
    pub client_id: String,
    pub client_secret: String,
    /// Integration user credentials (password grant)
    pub username: String,
    pub password: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for SalesforceApiConfig {
    fn default() -> Self {
        Self {
            login_url: "https://login.salesforce.com".to_string(),
            api_version: "v59.0".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_seconds: 30,
            user_agent: "atrium/1.0".to_string(),
        }
    }
}

impl SalesforceApiConfig {
    /// Build from the shared CRM settings
    pub fn from_settings(settings: &atrium_core::CrmSettings) -> Self {
        Self {
            login_url: settings.login_url.clone(),
            api_version: settings.api_version.clone(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            ..Default::default()
        }
        .with_timeout(settings.timeout_seconds)
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// The CRM operations the BFF routes need
#[async_trait]
pub trait CrmApi: Send + Sync {
    async fn list_affiliates(&self) -> AtriumResult<Vec<Affiliate>>;

    async fn get_affiliate(&self, id: &str) -> AtriumResult<Affiliate>;

    /// Create an affiliate record and return its id
    async fn create_affiliate(&self, affiliate: NewAffiliate) -> AtriumResult<String>;

    async fn update_affiliate(&self, id: &str, patch: AffiliatePatch) -> AtriumResult<()>;

    /// List workshops, optionally scoped to an organizing affiliate
    async fn list_workshops(&self, affiliate_id: Option<&str>) -> AtriumResult<Vec<Workshop>>;

    async fn get_workshop(&self, id: &str) -> AtriumResult<Workshop>;

    /// Create a workshop record and return its id
    async fn create_workshop(&self, workshop: NewWorkshop) -> AtriumResult<String>;

    async fn update_workshop(&self, id: &str, patch: WorkshopPatch) -> AtriumResult<()>;

    async fn list_facilitators(&self, workshop_id: &str) -> AtriumResult<Vec<Facilitator>>;

    async fn get_user(&self, id: &str) -> AtriumResult<CrmUser>;

    async fn find_user_by_email(&self, email: &str) -> AtriumResult<Option<CrmUser>>;
}

/// Helper function to create the HTTP client with common configuration
pub(crate) fn create_http_client(config: &SalesforceApiConfig) -> AtriumResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| {
            Box::new(AtriumError::Salesforce {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("salesforce_client").with_operation("create_client"),
            })
        })
}

/// Helper function to turn a failed HTTP response into an error with context
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> AtriumError {
    let status = response.status();
    let url = response.url().clone();

    let error_body = response.text().await.unwrap_or_default();

    AtriumError::Salesforce {
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
        context: ErrorContext::new("salesforce_client")
            .with_operation(operation)
            .with_suggestion(match status.as_u16() {
                400 => "Check the SOQL query or record payload",
                401 => "Check the connected app credentials",
                404 => "Record not found or not accessible",
                _ => "Check network connectivity and Salesforce status",
            }),
    }
}
