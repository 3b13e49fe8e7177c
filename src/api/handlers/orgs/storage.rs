//! Shared SQL storage helpers for organization and user entities.
//!
//! This module owns the CRUD queries, row-to-DTO mapping, and constraint
//! handling. Not-found is expressed as `Ok(None)`/`Ok(false)` so handlers own
//! the HTTP translation, while constraint violations map to `OrgError`.

use axum::{http::StatusCode, response::IntoResponse};
use sqlx::{postgres::PgRow, PgPool, Postgres, Row, Transaction};
use tracing::error;

use super::types::{
    CreateOrganizationRequest, CreateUserRequest, OrgStatus, OrganizationResponse,
    UpdateOrganizationRequest, UpdateUserRequest, UserResponse, UserRole,
};

#[derive(Debug)]
pub(super) enum OrgError {
    Conflict(&'static str),
    Database(sqlx::Error),
}

impl IntoResponse for OrgError {
    /// Maps storage-layer failures into stable HTTP responses for handlers.
    /// Database errors are logged server-side and surfaced as `500` without leaking details.
    fn into_response(self) -> axum::response::Response {
        match self {
            Self::Conflict(message) => (StatusCode::CONFLICT, message).into_response(),
            Self::Database(err) => {
                error!("Database error: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Lists a page of organizations in storage (id) order, each annotated with
/// the count of child pending requests. Negative paging values are clamped to
/// zero; Postgres rejects a negative OFFSET or LIMIT outright.
pub(super) async fn fetch_organizations(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<OrganizationResponse>, sqlx::Error> {
    let query = r#"
        SELECT
            o.id, o.name, o.slug, o.organization_mail, o.contact,
            o.website_url, o.primary_admin_name, o.primary_admin_email,
            o.support_email, o.phone_no, o.alternative_phone_no,
            o.max_coordinators, o.timezone_name, o.timezone_region,
            o.language, o.status, o.logo_url,
            to_char(o.created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(o.updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at,
            (
                SELECT COUNT(*) FROM pending_requests p
                WHERE p.organization_id = o.id
            ) AS pending_requests_count
        FROM organizations o
        ORDER BY o.id
        OFFSET $1 LIMIT $2
    "#;
    let rows = sqlx::query(query)
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(org_from_row).collect())
}

/// Fetches one organization by id with its pending-request count, or `None`.
pub(super) async fn fetch_organization(
    pool: &PgPool,
    id: i64,
) -> Result<Option<OrganizationResponse>, sqlx::Error> {
    let query = r#"
        SELECT
            o.id, o.name, o.slug, o.organization_mail, o.contact,
            o.website_url, o.primary_admin_name, o.primary_admin_email,
            o.support_email, o.phone_no, o.alternative_phone_no,
            o.max_coordinators, o.timezone_name, o.timezone_region,
            o.language, o.status, o.logo_url,
            to_char(o.created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(o.updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at,
            (
                SELECT COUNT(*) FROM pending_requests p
                WHERE p.organization_id = o.id
            ) AS pending_requests_count
        FROM organizations o
        WHERE o.id = $1
    "#;
    let row = sqlx::query(query).bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(org_from_row))
}

/// Inserts a new organization and seeds `seed_count` placeholder pending
/// requests inside the same transaction, so a partially seeded organization
/// cannot persist. Duplicate slugs map to `409`.
pub(super) async fn insert_organization(
    pool: &PgPool,
    payload: &CreateOrganizationRequest,
    seed_count: u16,
) -> Result<OrganizationResponse, OrgError> {
    let mut tx = pool.begin().await.map_err(OrgError::Database)?;

    let insert = sqlx::query(
        r#"
        INSERT INTO organizations (
            name, slug, organization_mail, contact,
            website_url, primary_admin_name, primary_admin_email,
            support_email, phone_no, alternative_phone_no,
            max_coordinators, timezone_name, timezone_region,
            language, status, logo_url
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING
            id, name, slug, organization_mail, contact,
            website_url, primary_admin_name, primary_admin_email,
            support_email, phone_no, alternative_phone_no,
            max_coordinators, timezone_name, timezone_region,
            language, status, logo_url,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.slug)
    .bind(&payload.organization_mail)
    .bind(&payload.contact)
    .bind(&payload.website_url)
    .bind(&payload.primary_admin_name)
    .bind(&payload.primary_admin_email)
    .bind(&payload.support_email)
    .bind(&payload.phone_no)
    .bind(&payload.alternative_phone_no)
    .bind(&payload.max_coordinators)
    .bind(&payload.timezone_name)
    .bind(&payload.timezone_region)
    .bind(&payload.language)
    .bind(payload.status.as_str())
    .bind(&payload.logo_url)
    .fetch_one(&mut *tx)
    .await;

    let row = match insert {
        Ok(row) => row,
        Err(err) => {
            if is_unique_violation(&err) {
                let _ = tx.rollback().await;
                return Err(OrgError::Conflict("Organization slug already exists."));
            }
            return Err(OrgError::Database(err));
        }
    };

    let organization_id: i64 = row.get("id");
    seed_pending_requests(&mut tx, organization_id, seed_count).await?;

    tx.commit().await.map_err(OrgError::Database)?;

    // The organization is freshly created, so its pending-request count is
    // exactly what was seeded.
    Ok(org_from_row_with_count(&row, i64::from(seed_count)))
}

/// Seeds `count` placeholder pending requests tagged "Request 1".."Request N"
/// for a freshly created organization. A demo fixture, not business logic;
/// `count` comes from server configuration and `0` disables it.
async fn seed_pending_requests(
    tx: &mut Transaction<'_, Postgres>,
    organization_id: i64,
    count: u16,
) -> Result<(), OrgError> {
    if count == 0 {
        return Ok(());
    }

    sqlx::query(
        r"
        INSERT INTO pending_requests (organization_id, request_type, status)
        SELECT $1, 'Request ' || n::text, 'pending'
        FROM generate_series(1, $2::int) AS n
        ",
    )
    .bind(organization_id)
    .bind(i32::from(count))
    .execute(&mut **tx)
    .await
    .map_err(OrgError::Database)?;

    Ok(())
}

/// Applies a partial update to an organization and returns the updated row,
/// or `None` when the id does not exist. `updated_at` is always refreshed.
///
/// Non-nullable fields use `COALESCE` (absent or null leaves them untouched);
/// nullable fields carry an explicit "provided" flag so `null` clears the
/// column while an absent field leaves it alone.
pub(super) async fn update_organization_record(
    pool: &PgPool,
    id: i64,
    payload: &UpdateOrganizationRequest,
) -> Result<Option<OrganizationResponse>, OrgError> {
    let (website_url_set, website_url) = patch(&payload.website_url);
    let (primary_admin_name_set, primary_admin_name) = patch(&payload.primary_admin_name);
    let (primary_admin_email_set, primary_admin_email) = patch(&payload.primary_admin_email);
    let (support_email_set, support_email) = patch(&payload.support_email);
    let (phone_no_set, phone_no) = patch(&payload.phone_no);
    let (alternative_phone_no_set, alternative_phone_no) = patch(&payload.alternative_phone_no);
    let (max_coordinators_set, max_coordinators) = patch(&payload.max_coordinators);
    let (timezone_name_set, timezone_name) = patch(&payload.timezone_name);
    let (timezone_region_set, timezone_region) = patch(&payload.timezone_region);
    let (language_set, language) = patch(&payload.language);
    let (logo_url_set, logo_url) = patch(&payload.logo_url);

    let update = sqlx::query(
        r#"
        WITH updated AS (
            UPDATE organizations SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                organization_mail = COALESCE($4, organization_mail),
                contact = COALESCE($5, contact),
                status = COALESCE($6, status),
                website_url = CASE WHEN $7 THEN $8 ELSE website_url END,
                primary_admin_name = CASE WHEN $9 THEN $10 ELSE primary_admin_name END,
                primary_admin_email = CASE WHEN $11 THEN $12 ELSE primary_admin_email END,
                support_email = CASE WHEN $13 THEN $14 ELSE support_email END,
                phone_no = CASE WHEN $15 THEN $16 ELSE phone_no END,
                alternative_phone_no = CASE WHEN $17 THEN $18 ELSE alternative_phone_no END,
                max_coordinators = CASE WHEN $19 THEN $20 ELSE max_coordinators END,
                timezone_name = CASE WHEN $21 THEN $22 ELSE timezone_name END,
                timezone_region = CASE WHEN $23 THEN $24 ELSE timezone_region END,
                language = CASE WHEN $25 THEN $26 ELSE language END,
                logo_url = CASE WHEN $27 THEN $28 ELSE logo_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
        )
        SELECT
            u.id, u.name, u.slug, u.organization_mail, u.contact,
            u.website_url, u.primary_admin_name, u.primary_admin_email,
            u.support_email, u.phone_no, u.alternative_phone_no,
            u.max_coordinators, u.timezone_name, u.timezone_region,
            u.language, u.status, u.logo_url,
            to_char(u.created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(u.updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at,
            (
                SELECT COUNT(*) FROM pending_requests p
                WHERE p.organization_id = u.id
            ) AS pending_requests_count
        FROM updated u
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.slug)
    .bind(&payload.organization_mail)
    .bind(&payload.contact)
    .bind(payload.status.map(OrgStatus::as_str))
    .bind(website_url_set)
    .bind(website_url)
    .bind(primary_admin_name_set)
    .bind(primary_admin_name)
    .bind(primary_admin_email_set)
    .bind(primary_admin_email)
    .bind(support_email_set)
    .bind(support_email)
    .bind(phone_no_set)
    .bind(phone_no)
    .bind(alternative_phone_no_set)
    .bind(alternative_phone_no)
    .bind(max_coordinators_set)
    .bind(max_coordinators)
    .bind(timezone_name_set)
    .bind(timezone_name)
    .bind(timezone_region_set)
    .bind(timezone_region)
    .bind(language_set)
    .bind(language)
    .bind(logo_url_set)
    .bind(logo_url)
    .fetch_optional(pool)
    .await;

    match update {
        Ok(row) => Ok(row.as_ref().map(org_from_row)),
        Err(err) => {
            if is_unique_violation(&err) {
                Err(OrgError::Conflict("Organization slug already exists."))
            } else {
                Err(OrgError::Database(err))
            }
        }
    }
}

/// Deletes an organization; the schema's `ON DELETE CASCADE` removes its
/// users and pending requests in the same statement. Returns `false` when the
/// id does not exist.
pub(super) async fn delete_organization_record(
    pool: &PgPool,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Lists all users belonging to an organization. An unknown organization id
/// yields an empty list, matching the listing contract.
pub(super) async fn fetch_organization_users(
    pool: &PgPool,
    organization_id: i64,
) -> Result<Vec<UserResponse>, sqlx::Error> {
    let query = r#"
        SELECT
            id, name, email, role, organization_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
        FROM users
        WHERE organization_id = $1
        ORDER BY id
    "#;
    let rows = sqlx::query(query)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.iter().map(user_from_row).collect())
}

/// Inserts a user tied to an organization id.
///
/// The organization id is deliberately not pre-validated here; the original
/// contract leaves referential failures to the database, so a dangling id
/// surfaces through the generic database error arm.
pub(super) async fn insert_user(
    pool: &PgPool,
    payload: &CreateUserRequest,
) -> Result<UserResponse, OrgError> {
    let insert = sqlx::query(
        r#"
        INSERT INTO users (name, email, role, organization_id)
        VALUES ($1, $2, $3, $4)
        RETURNING
            id, name, email, role, organization_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(payload.role.as_str())
    .bind(payload.organization_id)
    .fetch_one(pool)
    .await;

    match insert {
        Ok(row) => Ok(user_from_row(&row)),
        Err(err) => Err(OrgError::Database(err)),
    }
}

/// Applies a partial update to a user, or returns `None` when the id does not
/// exist. Same presence semantics as organizations.
pub(super) async fn update_user_record(
    pool: &PgPool,
    id: i64,
    payload: &UpdateUserRequest,
) -> Result<Option<UserResponse>, OrgError> {
    let (email_set, email) = patch(&payload.email);

    sqlx::query(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            role = COALESCE($3, role),
            email = CASE WHEN $4 THEN $5 ELSE email END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING
            id, name, email, role, organization_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at,
            to_char(updated_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS updated_at
        "#,
    )
    .bind(id)
    .bind(&payload.name)
    .bind(payload.role.map(UserRole::as_str))
    .bind(email_set)
    .bind(email)
    .fetch_optional(pool)
    .await
    .map(|row| row.as_ref().map(user_from_row))
    .map_err(OrgError::Database)
}

/// Deletes a user, returning `false` when the id does not exist.
pub(super) async fn delete_user_record(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Splits a double-option patch field into a (provided, value) bind pair.
fn patch(field: &Option<Option<String>>) -> (bool, Option<&str>) {
    match field {
        Some(value) => (true, value.as_deref()),
        None => (false, None),
    }
}

fn org_from_row(row: &PgRow) -> OrganizationResponse {
    org_from_row_with_count(row, row.get("pending_requests_count"))
}

fn org_from_row_with_count(row: &PgRow, pending_requests_count: i64) -> OrganizationResponse {
    let status: String = row.get("status");

    OrganizationResponse {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        organization_mail: row.get("organization_mail"),
        contact: row.get("contact"),
        website_url: row.get("website_url"),
        primary_admin_name: row.get("primary_admin_name"),
        primary_admin_email: row.get("primary_admin_email"),
        support_email: row.get("support_email"),
        phone_no: row.get("phone_no"),
        alternative_phone_no: row.get("alternative_phone_no"),
        max_coordinators: row.get("max_coordinators"),
        timezone_name: row.get("timezone_name"),
        timezone_region: row.get("timezone_region"),
        language: row.get("language"),
        // The schema CHECK keeps status within the enum.
        status: OrgStatus::parse(&status).unwrap_or_default(),
        logo_url: row.get("logo_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        pending_requests_count,
    }
}

fn user_from_row(row: &PgRow) -> UserResponse {
    let role: String = row.get("role");

    UserResponse {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        // The schema CHECK keeps role within the enum.
        role: UserRole::parse(&role).unwrap_or(UserRole::Coordinator),
        organization_id: row.get("organization_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Returns `true` when `err` is a database unique-violation (SQLSTATE `23505`).
/// This is used to translate constraint errors into stable API `409` responses.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}
