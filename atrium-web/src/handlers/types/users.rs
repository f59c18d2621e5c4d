//! User request/response types

use atrium_auth::Session;
use atrium_salesforce::CrmUser;
use serde::Serialize;
use utoipa::ToSchema;

/// CRM user as exposed over the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "0035g000003QrStAAK")]
    pub id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.org")]
    pub email: Option<String>,
    /// Affiliate the user belongs to, if any
    pub affiliate_id: Option<String>,
}

impl From<CrmUser> for UserResponse {
    fn from(record: CrmUser) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            affiliate_id: record.affiliate_id,
        }
    }
}

/// The caller's own session view, returned after permission augmentation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user_id: Option<i64>,
    #[schema(example = "ALL")]
    pub affiliate: Option<String>,
    pub roles: Vec<String>,
    /// Resource identifiers the caller holds permissions for
    pub permissions: Vec<String>,
    /// CRM contact matching the caller's email, if one exists
    pub contact: Option<UserResponse>,
}

impl From<&Session> for CurrentUserResponse {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            affiliate: session.affiliate.clone(),
            roles: session.roles.clone(),
            permissions: session
                .permissions
                .iter()
                .map(|entry| entry.resource.clone())
                .collect(),
            contact: None,
        }
    }
}
