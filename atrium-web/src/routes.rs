//! Route definitions for the Atrium web server
//!
//! Each protected route carries its gates as route layers: elevation where
//! the route requires the elevated role, then the access policy for the
//! remote check. Resource identifiers are relative to the `/api` nest.

use crate::{handlers, middleware, AppState};
use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use atrium_auth::{AccessLevel, AccessPolicy};

/// Create API routes with their authorization gates
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let read = AccessPolicy::new(AccessLevel::Read);
    let write = AccessPolicy::new(AccessLevel::Write);

    let access =
        |policy: AccessPolicy| from_fn_with_state((state.clone(), policy), middleware::access_guard);
    let elevation = || from_fn_with_state(state.clone(), middleware::elevation_guard);
    let permissions = || from_fn_with_state(state.clone(), middleware::permissions_guard);

    Router::new()
        // Open endpoints
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(crate::openapi::openapi_spec))
        // Affiliates
        .route(
            "/affiliates",
            get(handlers::list_affiliates)
                .route_layer(access(read.clone()))
                .merge(
                    post(handlers::create_affiliate)
                        .route_layer(access(write.clone()))
                        .route_layer(elevation()),
                ),
        )
        .route(
            "/affiliates/{id}",
            get(handlers::get_affiliate)
                .route_layer(access(read.clone()))
                .merge(
                    patch(handlers::update_affiliate)
                        .route_layer(access(write.clone()))
                        .route_layer(elevation()),
                ),
        )
        // Workshops; list and create are scoped to the session's affiliate
        .route(
            "/workshops",
            get(handlers::list_workshops)
                .route_layer(access(
                    read.clone().with_resource("GET: /workshops/{affiliate}"),
                ))
                .merge(post(handlers::create_workshop).route_layer(access(
                    write.clone().with_resource("POST: /workshops/{affiliate}"),
                ))),
        )
        .route(
            "/workshops/{id}",
            get(handlers::get_workshop)
                .route_layer(access(read.clone()))
                .merge(patch(handlers::update_workshop).route_layer(access(write))),
        )
        .route(
            "/workshops/{id}/facilitators",
            get(handlers::list_facilitators).route_layer(access(read.clone())),
        )
        // Users
        .route(
            "/users/me",
            get(handlers::current_user).route_layer(permissions()),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user).route_layer(access(AccessPolicy::new(AccessLevel::Admin))),
        )
}
