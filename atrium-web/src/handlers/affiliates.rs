//! Affiliate handlers

use super::types::{
    AffiliateResponse, CreateAffiliateRequest, CreatedResponse, UpdateAffiliateRequest,
    UpdatedResponse,
};
use crate::{AppState, WebError, WebResult};
use axum::{
    extract::{Path, State},
    response::Json,
    Json as JsonExtractor,
};
use tracing::info;

/// List all affiliates
#[utoipa::path(
    get,
    path = "/api/affiliates",
    tag = "Affiliates",
    summary = "List affiliates",
    responses(
        (status = 200, description = "Affiliate list", body = Vec<AffiliateResponse>),
        (status = 403, description = "Access denied")
    )
)]
pub async fn list_affiliates(
    State(state): State<AppState>,
) -> WebResult<Json<Vec<AffiliateResponse>>> {
    let affiliates = state.crm.list_affiliates().await?;

    Ok(Json(
        affiliates.into_iter().map(AffiliateResponse::from).collect(),
    ))
}

/// Get a single affiliate by id
#[utoipa::path(
    get,
    path = "/api/affiliates/{id}",
    tag = "Affiliates",
    summary = "Get affiliate",
    params(("id" = String, Path, description = "Affiliate id")),
    responses(
        (status = 200, description = "Affiliate", body = AffiliateResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Affiliate not found")
    )
)]
pub async fn get_affiliate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<AffiliateResponse>> {
    let affiliate = state.crm.get_affiliate(&id).await?;
    Ok(Json(affiliate.into()))
}

/// Create an affiliate
#[utoipa::path(
    post,
    path = "/api/affiliates",
    tag = "Affiliates",
    summary = "Create affiliate",
    request_body = CreateAffiliateRequest,
    responses(
        (status = 200, description = "Affiliate created", body = CreatedResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Access denied")
    )
)]
pub async fn create_affiliate(
    State(state): State<AppState>,
    JsonExtractor(request): JsonExtractor<CreateAffiliateRequest>,
) -> WebResult<Json<CreatedResponse>> {
    if request.name.trim().is_empty() {
        return Err(WebError::Validation("Affiliate name is required".to_string()));
    }

    let id = state.crm.create_affiliate(request.into()).await?;
    info!(affiliate_id = %id, "Created affiliate");

    Ok(Json(CreatedResponse { id }))
}

/// Update an affiliate
#[utoipa::path(
    patch,
    path = "/api/affiliates/{id}",
    tag = "Affiliates",
    summary = "Update affiliate",
    params(("id" = String, Path, description = "Affiliate id")),
    request_body = UpdateAffiliateRequest,
    responses(
        (status = 200, description = "Affiliate updated", body = UpdatedResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Affiliate not found")
    )
)]
pub async fn update_affiliate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonExtractor(request): JsonExtractor<UpdateAffiliateRequest>,
) -> WebResult<Json<UpdatedResponse>> {
    state.crm.update_affiliate(&id, request.into()).await?;
    info!(affiliate_id = %id, "Updated affiliate");

    Ok(Json(UpdatedResponse::new()))
}
