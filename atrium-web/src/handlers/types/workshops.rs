//! Workshop and facilitator request/response types

use atrium_salesforce::{Facilitator, NewWorkshop, Workshop, WorkshopPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Workshop as exposed over the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkshopResponse {
    #[schema(example = "a0C5g000002XyZwEAK")]
    pub id: String,
    #[schema(example = "Intro to Facilitation")]
    pub name: String,
    /// Organizing affiliate id
    #[schema(example = "a0B5g000001AbCdEAK")]
    pub affiliate_id: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    #[schema(example = "Planned")]
    pub status: Option<String>,
}

impl From<Workshop> for WorkshopResponse {
    fn from(record: Workshop) -> Self {
        Self {
            id: record.id,
            name: record.name,
            affiliate_id: record.affiliate_id,
            start_date: record.start_date,
            end_date: record.end_date,
            status: record.status,
        }
    }
}

/// Request to create a workshop
///
/// The organizing affiliate comes from the caller's session scope, not the
/// payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWorkshopRequest {
    #[schema(example = "Intro to Facilitation")]
    pub name: String,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

impl CreateWorkshopRequest {
    /// Bind the request to an organizing affiliate
    pub fn into_record(self, affiliate_id: String) -> NewWorkshop {
        NewWorkshop {
            name: self.name,
            affiliate_id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Request to update a workshop; absent fields are left untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateWorkshopRequest {
    pub name: Option<String>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
    pub status: Option<String>,
}

impl From<UpdateWorkshopRequest> for WorkshopPatch {
    fn from(request: UpdateWorkshopRequest) -> Self {
        Self {
            name: request.name,
            start_date: request.start_date,
            end_date: request.end_date,
            status: request.status,
        }
    }
}

/// Facilitator as exposed over the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FacilitatorResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

impl From<Facilitator> for FacilitatorResponse {
    fn from(record: Facilitator) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}
