//! Typed Salesforce records and wire DTOs

use serde::{Deserialize, Serialize};

/// Affiliate record (custom object `Affiliate__c`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affiliate {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "City__c")]
    pub city: Option<String>,
    #[serde(rename = "Country__c")]
    pub country: Option<String>,
    #[serde(rename = "Status__c")]
    pub status: Option<String>,
}

/// New affiliate payload (sobject create)
#[derive(Debug, Clone, Serialize)]
pub struct NewAffiliate {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "City__c", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "Country__c", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Affiliate update payload (sobject patch; absent fields are untouched)
#[derive(Debug, Clone, Default, Serialize)]
pub struct AffiliatePatch {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "City__c", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "Country__c", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "Status__c", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Workshop record (custom object `Workshop__c`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workshop {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Organizing_Affiliate__c")]
    pub affiliate_id: String,
    #[serde(rename = "Start_Date__c")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(rename = "End_Date__c")]
    pub end_date: Option<chrono::NaiveDate>,
    #[serde(rename = "Status__c")]
    pub status: Option<String>,
}

/// New workshop payload (sobject create)
#[derive(Debug, Clone, Serialize)]
pub struct NewWorkshop {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Organizing_Affiliate__c")]
    pub affiliate_id: String,
    #[serde(rename = "Start_Date__c", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(rename = "End_Date__c", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
}

/// Workshop update payload (sobject patch)
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkshopPatch {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Start_Date__c", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<chrono::NaiveDate>,
    #[serde(rename = "End_Date__c", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<chrono::NaiveDate>,
    #[serde(rename = "Status__c", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Facilitator record (custom object `Facilitator__c`, workshop-scoped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facilitator {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email__c")]
    pub email: Option<String>,
}

/// CRM user (standard `Contact` object)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmUser {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "AccountId")]
    pub affiliate_id: Option<String>,
}

/// SOQL query response envelope
#[derive(Debug, Deserialize)]
pub struct QueryResponse<T> {
    #[serde(rename = "totalSize")]
    pub total_size: u64,
    pub done: bool,
    pub records: Vec<T>,
}

/// Result of an sobject create call
#[derive(Debug, Deserialize)]
pub struct CreateResult {
    pub id: String,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

/// OAuth password-grant token response
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    pub instance_url: String,
    pub token_type: String,
}
