//! OpenAPI specification for the Atrium web server

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::{
    AffiliateResponse, CreateAffiliateRequest, CreateWorkshopRequest, CreatedResponse,
    CurrentUserResponse, FacilitatorResponse, HealthResponse, UpdateAffiliateRequest,
    UpdateWorkshopRequest, UpdatedResponse, UserResponse, WorkshopResponse,
};

/// Main OpenAPI specification for the Atrium API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atrium API",
        version = "0.1.0",
        description = "Backend-for-frontend over a Salesforce CRM with remote authorization",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Health
        crate::handlers::health_check,

        // Affiliates
        crate::handlers::list_affiliates,
        crate::handlers::get_affiliate,
        crate::handlers::create_affiliate,
        crate::handlers::update_affiliate,

        // Workshops
        crate::handlers::list_workshops,
        crate::handlers::get_workshop,
        crate::handlers::create_workshop,
        crate::handlers::update_workshop,
        crate::handlers::list_facilitators,

        // Users
        crate::handlers::current_user,
        crate::handlers::get_user,
    ),
    components(
        schemas(
            HealthResponse,
            CreatedResponse,
            UpdatedResponse,
            AffiliateResponse,
            CreateAffiliateRequest,
            UpdateAffiliateRequest,
            WorkshopResponse,
            CreateWorkshopRequest,
            UpdateWorkshopRequest,
            FacilitatorResponse,
            UserResponse,
            CurrentUserResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Affiliates", description = "Affiliate records"),
        (name = "Workshops", description = "Workshops and their facilitators"),
        (name = "Users", description = "CRM users and the caller's session"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for the API
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "identity_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-jwt"))),
            );
        }
    }
}

/// Serve the OpenAPI specification as JSON
pub async fn openapi_spec() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "Atrium API");
        assert_eq!(openapi.info.version, "0.1.0");
        assert!(!openapi.paths.paths.is_empty());
    }

    #[test]
    fn test_openapi_serializes() {
        let json = ApiDoc::openapi().to_pretty_json().unwrap();
        assert!(json.contains("/api/affiliates"));
        assert!(json.contains("x-jwt"));
    }
}
