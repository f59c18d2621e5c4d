//! Affiliate request/response types

use atrium_salesforce::{Affiliate, AffiliatePatch, NewAffiliate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Affiliate as exposed over the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AffiliateResponse {
    #[schema(example = "a0B5g000001AbCdEAK")]
    pub id: String,
    #[schema(example = "Acme Community Center")]
    pub name: String,
    #[schema(example = "Berlin")]
    pub city: Option<String>,
    #[schema(example = "Germany")]
    pub country: Option<String>,
    #[schema(example = "Active")]
    pub status: Option<String>,
}

impl From<Affiliate> for AffiliateResponse {
    fn from(record: Affiliate) -> Self {
        Self {
            id: record.id,
            name: record.name,
            city: record.city,
            country: record.country,
            status: record.status,
        }
    }
}

/// Request to create an affiliate
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAffiliateRequest {
    #[schema(example = "Acme Community Center")]
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl From<CreateAffiliateRequest> for NewAffiliate {
    fn from(request: CreateAffiliateRequest) -> Self {
        Self {
            name: request.name,
            city: request.city,
            country: request.country,
        }
    }
}

/// Request to update an affiliate; absent fields are left untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAffiliateRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub status: Option<String>,
}

impl From<UpdateAffiliateRequest> for AffiliatePatch {
    fn from(request: UpdateAffiliateRequest) -> Self {
        Self {
            name: request.name,
            city: request.city,
            country: request.country,
            status: request.status,
        }
    }
}
