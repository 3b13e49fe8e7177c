//! User CRUD handlers.
//!
//! Users belong to exactly one organization. Listing is scoped by the parent
//! organization id; create/update/delete operate on the user id directly.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use tracing::error;

use super::{
    storage::{delete_user_record, fetch_organization_users, insert_user, update_user_record},
    types::{CreateUserRequest, UpdateUserRequest, UserResponse},
};

#[utoipa::path(
    get,
    path = "/api/organizations/{id}/users",
    params(("id" = i64, Path, description = "Organization id")),
    responses(
        (status = 200, description = "Users belonging to the organization.", body = [UserResponse]),
    ),
    tag = "users"
)]
/// Lists all users of an organization. An unknown organization id yields an
/// empty list.
pub async fn list_organization_users(
    Path(id): Path<i64>,
    pool: Extension<PgPool>,
) -> impl IntoResponse {
    match fetch_organization_users(&pool, id).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => {
            error!("Failed to list users: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created.", body = UserResponse),
    ),
    tag = "users"
)]
/// Creates a user tied to the organization id in the payload.
/// The id is not pre-validated; a dangling reference fails at the database.
pub async fn create_user(
    pool: Extension<PgPool>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    match insert_user(&pool, &payload).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    request_body = UpdateUserRequest,
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User updated.", body = UserResponse),
        (status = 404, description = "User not found."),
    ),
    tag = "users"
)]
/// Applies a partial update: only fields present in the payload are written,
/// and `updated_at` is refreshed.
pub async fn update_user(
    Path(id): Path<i64>,
    pool: Extension<PgPool>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    match update_user_record(&pool, id, &payload).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted."),
        (status = 404, description = "User not found."),
    ),
    tag = "users"
)]
/// Deletes a user by id.
pub async fn delete_user(Path(id): Path<i64>, pool: Extension<PgPool>) -> impl IntoResponse {
    match delete_user_record(&pool, id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({"message": "User deleted successfully"})),
        )
            .into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(err) => {
            error!("Failed to delete user: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
