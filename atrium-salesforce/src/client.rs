//! Salesforce REST client implementation

use async_trait::async_trait;
use atrium_core::{not_found_error, AtriumError, AtriumResult, ErrorContext};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{create_http_client, handle_response_error, CrmApi, SalesforceApiConfig};
use crate::records::{
    Affiliate, AffiliatePatch, CreateResult, CrmUser, Facilitator, NewAffiliate, NewWorkshop,
    OAuthTokenResponse, QueryResponse, Workshop, WorkshopPatch,
};
use crate::soql;

/// Tokens older than this are refreshed proactively
const TOKEN_TTL_MINUTES: i64 = 90;

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    instance_url: String,
    acquired_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        (Utc::now() - self.acquired_at).num_minutes() >= TOKEN_TTL_MINUTES
    }
}

/// Salesforce REST client
///
/// Holds one long-lived HTTP client and a cached OAuth token. The token is
/// fetched on first use, reused until it expires, and refreshed once when a
/// request comes back 401.
pub struct SalesforceClient {
    client: reqwest::Client,
    config: SalesforceApiConfig,
    token: RwLock<Option<CachedToken>>,
}

impl SalesforceClient {
    pub fn new(config: SalesforceApiConfig) -> AtriumResult<Self> {
        let client = create_http_client(&config)?;

        info!("Created Salesforce client for {}", config.login_url);

        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    /// Perform the OAuth password-grant exchange
    async fn authenticate(&self) -> AtriumResult<CachedToken> {
        let url = format!(
            "{}/services/oauth2/token",
            self.config.login_url.trim_end_matches('/')
        );

        debug!("Authenticating against {}", url);

        let params = [
            ("grant_type", "password"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                Box::new(AtriumError::Network {
                    message: format!("Salesforce token request failed: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("salesforce_client")
                        .with_operation("authenticate")
                        .with_suggestion("Check that the login URL is reachable"),
                })
            })?;

        if !response.status().is_success() {
            return Err(Box::new(handle_response_error(response, "authenticate").await));
        }

        let token: OAuthTokenResponse = response.json().await.map_err(|e| {
            Box::new(AtriumError::Salesforce {
                message: format!("Failed to parse token response: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("salesforce_client").with_operation("authenticate"),
            })
        })?;

        info!("Salesforce authentication succeeded");

        Ok(CachedToken {
            access_token: token.access_token,
            instance_url: token.instance_url,
            acquired_at: Utc::now(),
        })
    }

    /// Get a valid token, authenticating if the cache is empty or expired
    async fn ensure_token(&self) -> AtriumResult<CachedToken> {
        if let Some(token) = self.token.read().await.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
        }

        let token = self.authenticate().await?;
        *guard = Some(token.clone());
        Ok(token)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    fn data_url(&self, token: &CachedToken, path: &str) -> String {
        format!(
            "{}/services/data/{}/{}",
            token.instance_url.trim_end_matches('/'),
            self.config.api_version,
            path.trim_start_matches('/')
        )
    }

    /// Run a SOQL query, re-authenticating once on 401
    async fn query<T: DeserializeOwned>(&self, soql: &str) -> AtriumResult<QueryResponse<T>> {
        let mut reauthenticated = false;

        loop {
            let token = self.ensure_token().await?;
            let url = self.data_url(&token, "query");

            debug!(soql, "Running SOQL query");

            let response = self
                .client
                .get(&url)
                .query(&[("q", soql)])
                .bearer_auth(&token.access_token)
                .send()
                .await
                .map_err(|e| {
                    Box::new(AtriumError::Network {
                        message: format!("Salesforce query failed: {}", e),
                        source: Some(Box::new(e)),
                        context: ErrorContext::new("salesforce_client").with_operation("query"),
                    })
                })?;

            if response.status() == StatusCode::UNAUTHORIZED && !reauthenticated {
                warn!("Salesforce session expired; re-authenticating");
                self.invalidate_token().await;
                reauthenticated = true;
                continue;
            }

            if !response.status().is_success() {
                return Err(Box::new(handle_response_error(response, "query").await));
            }

            return response.json().await.map_err(|e| {
                Box::new(AtriumError::Salesforce {
                    message: format!("Failed to parse query response: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("salesforce_client").with_operation("query"),
                })
            });
        }
    }

    /// Query expecting exactly one record
    async fn query_one<T: DeserializeOwned>(
        &self,
        soql: &str,
        resource: &str,
    ) -> AtriumResult<T> {
        let mut response = self.query::<T>(soql).await?;

        match response.records.pop() {
            Some(record) => Ok(record),
            None => Err(Box::new(not_found_error!(resource, "salesforce_client"))),
        }
    }

    /// Create an sobject record and return its id
    async fn create_record<B: Serialize>(&self, sobject: &str, body: &B) -> AtriumResult<String> {
        let mut reauthenticated = false;

        loop {
            let token = self.ensure_token().await?;
            let url = self.data_url(&token, &format!("sobjects/{}", sobject));

            let response = self
                .client
                .post(&url)
                .bearer_auth(&token.access_token)
                .json(body)
                .send()
                .await
                .map_err(|e| {
                    Box::new(AtriumError::Network {
                        message: format!("Salesforce create failed: {}", e),
                        source: Some(Box::new(e)),
                        context: ErrorContext::new("salesforce_client")
                            .with_operation("create_record"),
                    })
                })?;

            if response.status() == StatusCode::UNAUTHORIZED && !reauthenticated {
                self.invalidate_token().await;
                reauthenticated = true;
                continue;
            }

            if !response.status().is_success() {
                return Err(Box::new(
                    handle_response_error(response, "create_record").await,
                ));
            }

            let result: CreateResult = response.json().await.map_err(|e| {
                Box::new(AtriumError::Salesforce {
                    message: format!("Failed to parse create response: {}", e),
                    source: Some(Box::new(e)),
                    context: ErrorContext::new("salesforce_client").with_operation("create_record"),
                })
            })?;

            if !result.success {
                return Err(Box::new(AtriumError::Salesforce {
                    message: format!("Salesforce rejected the record: {:?}", result.errors),
                    source: None,
                    context: ErrorContext::new("salesforce_client").with_operation("create_record"),
                }));
            }

            info!(sobject, id = %result.id, "Created Salesforce record");
            return Ok(result.id);
        }
    }

    /// Patch an sobject record (204 on success)
    async fn patch_record<B: Serialize>(
        &self,
        sobject: &str,
        id: &str,
        body: &B,
    ) -> AtriumResult<()> {
        let mut reauthenticated = false;

        loop {
            let token = self.ensure_token().await?;
            let url = self.data_url(&token, &format!("sobjects/{}/{}", sobject, id));

            let response = self
                .client
                .patch(&url)
                .bearer_auth(&token.access_token)
                .json(body)
                .send()
                .await
                .map_err(|e| {
                    Box::new(AtriumError::Network {
                        message: format!("Salesforce update failed: {}", e),
                        source: Some(Box::new(e)),
                        context: ErrorContext::new("salesforce_client")
                            .with_operation("patch_record"),
                    })
                })?;

            if response.status() == StatusCode::UNAUTHORIZED && !reauthenticated {
                self.invalidate_token().await;
                reauthenticated = true;
                continue;
            }

            if !response.status().is_success() {
                return Err(Box::new(
                    handle_response_error(response, "patch_record").await,
                ));
            }

            debug!(sobject, id, "Updated Salesforce record");
            return Ok(());
        }
    }
}

#[async_trait]
impl CrmApi for SalesforceClient {
    async fn list_affiliates(&self) -> AtriumResult<Vec<Affiliate>> {
        Ok(self.query(&soql::affiliates()).await?.records)
    }

    async fn get_affiliate(&self, id: &str) -> AtriumResult<Affiliate> {
        self.query_one(&soql::affiliate_by_id(id), &format!("Affiliate {}", id))
            .await
    }

    async fn create_affiliate(&self, affiliate: NewAffiliate) -> AtriumResult<String> {
        self.create_record("Affiliate__c", &affiliate).await
    }

    async fn update_affiliate(&self, id: &str, patch: AffiliatePatch) -> AtriumResult<()> {
        self.patch_record("Affiliate__c", id, &patch).await
    }

    async fn list_workshops(&self, affiliate_id: Option<&str>) -> AtriumResult<Vec<Workshop>> {
        Ok(self.query(&soql::workshops(affiliate_id)).await?.records)
    }

    async fn get_workshop(&self, id: &str) -> AtriumResult<Workshop> {
        self.query_one(&soql::workshop_by_id(id), &format!("Workshop {}", id))
            .await
    }

    async fn create_workshop(&self, workshop: NewWorkshop) -> AtriumResult<String> {
        self.create_record("Workshop__c", &workshop).await
    }

    async fn update_workshop(&self, id: &str, patch: WorkshopPatch) -> AtriumResult<()> {
        self.patch_record("Workshop__c", id, &patch).await
    }

    async fn list_facilitators(&self, workshop_id: &str) -> AtriumResult<Vec<Facilitator>> {
        Ok(self
            .query(&soql::facilitators_for_workshop(workshop_id))
            .await?
            .records)
    }

    async fn get_user(&self, id: &str) -> AtriumResult<CrmUser> {
        self.query_one(&soql::user_by_id(id), &format!("User {}", id))
            .await
    }

    async fn find_user_by_email(&self, email: &str) -> AtriumResult<Option<CrmUser>> {
        let mut response = self.query::<CrmUser>(&soql::user_by_email(email)).await?;
        Ok(response.records.pop())
    }
}
