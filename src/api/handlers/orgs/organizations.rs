//! Organization CRUD handlers.
//!
//! This module implements the organization endpoints and delegates database
//! access to the shared `storage` module. Unknown ids return `404` with a
//! static message.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use tracing::error;

use super::{
    storage::{
        delete_organization_record, fetch_organization, fetch_organizations, insert_organization,
        update_organization_record,
    },
    types::{
        CreateOrganizationRequest, ListOrganizationsParams, OrganizationResponse,
        UpdateOrganizationRequest,
    },
};
use crate::api::ServerConfig;

#[utoipa::path(
    get,
    path = "/api/organizations",
    params(ListOrganizationsParams),
    responses(
        (status = 200, description = "Page of organizations, each with its pending-request count.", body = [OrganizationResponse]),
    ),
    tag = "organizations"
)]
/// Lists organizations in storage order with `skip`/`limit` paging.
/// Each entry carries a computed `pending_requests_count`.
pub async fn list_organizations(
    Query(params): Query<ListOrganizationsParams>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    match fetch_organizations(&pool, params.skip, params.limit).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => {
            error!("Failed to list organizations: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    params(("id" = i64, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization detail.", body = OrganizationResponse),
        (status = 404, description = "Organization not found."),
    ),
    tag = "organizations"
)]
/// Fetches one organization by id, including its pending-request count.
pub async fn get_organization(
    Path(id): Path<i64>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    match fetch_organization(&pool, id).await {
        Ok(Some(organization)) => (StatusCode::OK, Json(organization)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Organization not found").into_response(),
        Err(err) => {
            error!("Failed to get organization: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/organizations",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created.", body = OrganizationResponse),
        (status = 409, description = "Organization slug already exists.", body = String),
    ),
    tag = "organizations"
)]
/// Creates a new organization and seeds the configured number of placeholder
/// pending requests. The response includes the resulting count.
pub async fn create_organization(
    pool: Extension<PgPool>,
    config: Extension<ServerConfig>,
    Json(payload): Json<CreateOrganizationRequest>,
) -> impl IntoResponse {
    match insert_organization(&pool, &payload, config.pending_seed).await {
        Ok(organization) => (StatusCode::CREATED, Json(organization)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/organizations/{id}",
    request_body = UpdateOrganizationRequest,
    params(("id" = i64, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization updated.", body = OrganizationResponse),
        (status = 404, description = "Organization not found."),
        (status = 409, description = "Organization slug already exists.", body = String),
    ),
    tag = "organizations"
)]
/// Applies a partial update: only fields present in the payload are written,
/// and `updated_at` is refreshed.
pub async fn update_organization(
    Path(id): Path<i64>,
    pool: Extension<PgPool>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> impl IntoResponse {
    match update_organization_record(&pool, id, &payload).await {
        Ok(Some(organization)) => (StatusCode::OK, Json(organization)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Organization not found").into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/organizations/{id}",
    params(("id" = i64, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Organization deleted, cascading to its users and pending requests."),
        (status = 404, description = "Organization not found."),
    ),
    tag = "organizations"
)]
/// Deletes an organization; the cascade removes its users and pending requests.
pub async fn delete_organization(
    Path(id): Path<i64>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    match delete_organization_record(&pool, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({"message": "Organization deleted successfully"})),
        )
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Organization not found").into_response(),
        Err(err) => {
            error!("Failed to delete organization: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
