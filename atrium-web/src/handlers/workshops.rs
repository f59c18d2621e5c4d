//! Workshop and facilitator handlers
//!
//! Workshop listing and creation are scoped to the session's affiliate. The
//! `"ALL"` scope lists every workshop; creation needs a concrete affiliate
//! to bind the record to.

use super::types::{
    CreateWorkshopRequest, CreatedResponse, FacilitatorResponse, UpdateWorkshopRequest,
    UpdatedResponse, WorkshopResponse,
};
use crate::{middleware::SessionContext, AppState, WebError, WebResult};
use axum::{
    extract::{Path, State},
    response::Json,
    Extension, Json as JsonExtractor,
};
use tracing::info;

const UNSCOPED: &str = "ALL";

/// List workshops visible to the caller's affiliate scope
#[utoipa::path(
    get,
    path = "/api/workshops",
    tag = "Workshops",
    summary = "List workshops",
    description = "List workshops, scoped to the session's affiliate unless the scope is ALL",
    responses(
        (status = 200, description = "Workshop list", body = Vec<WorkshopResponse>),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_workshops(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
) -> WebResult<Json<Vec<WorkshopResponse>>> {
    let affiliate = {
        let session = context.handle.read().await;
        session.affiliate.clone()
    };

    let scope = affiliate.as_deref().filter(|a| *a != UNSCOPED);
    let workshops = state.crm.list_workshops(scope).await?;

    Ok(Json(
        workshops.into_iter().map(WorkshopResponse::from).collect(),
    ))
}

/// Get a single workshop by id
#[utoipa::path(
    get,
    path = "/api/workshops/{id}",
    tag = "Workshops",
    summary = "Get workshop",
    params(("id" = String, Path, description = "Workshop id")),
    responses(
        (status = 200, description = "Workshop", body = WorkshopResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn get_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<WorkshopResponse>> {
    let workshop = state.crm.get_workshop(&id).await?;
    Ok(Json(workshop.into()))
}

/// Create a workshop under the session's affiliate
#[utoipa::path(
    post,
    path = "/api/workshops",
    tag = "Workshops",
    summary = "Create workshop",
    request_body = CreateWorkshopRequest,
    responses(
        (status = 200, description = "Workshop created", body = CreatedResponse),
        (status = 400, description = "Invalid payload or no affiliate scope"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn create_workshop(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    JsonExtractor(request): JsonExtractor<CreateWorkshopRequest>,
) -> WebResult<Json<CreatedResponse>> {
    if request.name.trim().is_empty() {
        return Err(WebError::Validation("Workshop name is required".to_string()));
    }

    let affiliate = {
        let session = context.handle.read().await;
        session.affiliate.clone()
    };

    // Records need a concrete organizing affiliate
    let affiliate = match affiliate.filter(|a| a != UNSCOPED) {
        Some(affiliate) => affiliate,
        None => {
            return Err(WebError::Validation(
                "Session has no affiliate scope to organize the workshop under".to_string(),
            ))
        }
    };

    let id = state.crm.create_workshop(request.into_record(affiliate)).await?;
    info!(workshop_id = %id, "Created workshop");

    Ok(Json(CreatedResponse { id }))
}

/// Update a workshop
#[utoipa::path(
    patch,
    path = "/api/workshops/{id}",
    tag = "Workshops",
    summary = "Update workshop",
    params(("id" = String, Path, description = "Workshop id")),
    request_body = UpdateWorkshopRequest,
    responses(
        (status = 200, description = "Workshop updated", body = UpdatedResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn update_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(request): JsonExtractor<UpdateWorkshopRequest>,
) -> WebResult<Json<UpdatedResponse>> {
    state.crm.update_workshop(&id, request.into()).await?;
    info!(workshop_id = %id, "Updated workshop");

    Ok(Json(UpdatedResponse::new()))
}

/// List facilitators assigned to a workshop
#[utoipa::path(
    get,
    path = "/api/workshops/{id}/facilitators",
    tag = "Workshops",
    summary = "List workshop facilitators",
    params(("id" = String, Path, description = "Workshop id")),
    responses(
        (status = 200, description = "Facilitator list", body = Vec<FacilitatorResponse>),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_facilitators(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<Vec<FacilitatorResponse>>> {
    let facilitators = state.crm.list_facilitators(&id).await?;

    Ok(Json(
        facilitators
            .into_iter()
            .map(FacilitatorResponse::from)
            .collect(),
    ))
}
