//! Request/response types for the organization and user APIs.
//!
//! These payloads are shared between handlers and `OpenAPI` generation.
//!
//! Update payloads distinguish "field not provided" from "field provided as
//! null": nullable columns use `Option<Option<String>>`, where a missing key
//! deserializes to `None` (leave untouched) and an explicit `null` to
//! `Some(None)` (clear the column).

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Deserializer for patch fields on nullable columns. Plain
/// `Option<Option<T>>` folds an explicit `null` into the outer `None`, losing
/// the distinction from an absent key. Wrapping every present value in `Some`
/// keeps it: absent stays `None` via the struct default, `null` becomes
/// `Some(None)`, a value becomes `Some(Some(value))`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum OrgStatus {
    #[default]
    Active,
    Blocked,
    Inactive,
}

impl OrgStatus {
    /// Canonical string representation, matching the `status` CHECK constraint.
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Blocked => "Blocked",
            Self::Inactive => "Inactive",
        }
    }

    pub(super) fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(Self::Active),
            "Blocked" => Some(Self::Blocked),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    Admin,
    #[serde(rename = "Co-ordinator")]
    Coordinator,
}

impl UserRole {
    /// Canonical string representation, matching the `role` CHECK constraint.
    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Coordinator => "Co-ordinator",
        }
    }

    pub(super) fn parse(value: &str) -> Option<Self> {
        match value {
            "Admin" => Some(Self::Admin),
            "Co-ordinator" => Some(Self::Coordinator),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrganizationsParams {
    /// Number of rows to skip from the start of the listing.
    #[serde(default)]
    pub skip: i64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

fn default_max_coordinators() -> Option<String> {
    Some("Upto 5 Coordinators".to_string())
}

fn default_timezone_name() -> Option<String> {
    Some("India Standard Time".to_string())
}

fn default_timezone_region() -> Option<String> {
    Some("Asia/Colombo".to_string())
}

fn default_language() -> Option<String> {
    Some("English".to_string())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub slug: String,
    pub organization_mail: String,
    pub contact: String,
    pub website_url: Option<String>,
    pub primary_admin_name: Option<String>,
    pub primary_admin_email: Option<String>,
    pub support_email: Option<String>,
    pub phone_no: Option<String>,
    pub alternative_phone_no: Option<String>,
    #[serde(default = "default_max_coordinators")]
    pub max_coordinators: Option<String>,
    #[serde(default = "default_timezone_name")]
    pub timezone_name: Option<String>,
    #[serde(default = "default_timezone_region")]
    pub timezone_region: Option<String>,
    #[serde(default = "default_language")]
    pub language: Option<String>,
    #[serde(default)]
    pub status: OrgStatus,
    pub logo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub organization_mail: Option<String>,
    pub contact: Option<String>,
    pub status: Option<OrgStatus>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub website_url: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub primary_admin_name: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub primary_admin_email: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub support_email: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_no: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub alternative_phone_no: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub max_coordinators: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub timezone_name: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub timezone_region: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub language: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrganizationResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub organization_mail: String,
    pub contact: String,
    pub website_url: Option<String>,
    pub primary_admin_name: Option<String>,
    pub primary_admin_email: Option<String>,
    pub support_email: Option<String>,
    pub phone_no: Option<String>,
    pub alternative_phone_no: Option<String>,
    pub max_coordinators: Option<String>,
    pub timezone_name: Option<String>,
    pub timezone_region: Option<String>,
    pub language: Option<String>,
    pub status: OrgStatus,
    pub logo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub pending_requests_count: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub role: UserRole,
    pub email: Option<String>,
    pub organization_id: i64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub organization_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_exact_spellings() {
        for status in [OrgStatus::Active, OrgStatus::Blocked, OrgStatus::Inactive] {
            let json = serde_json::to_string(&status).expect("serialize");
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(OrgStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrgStatus::parse("active"), None);
    }

    #[test]
    fn role_uses_hyphenated_coordinator() {
        let json = serde_json::to_string(&UserRole::Coordinator).expect("serialize");
        assert_eq!(json, "\"Co-ordinator\"");

        let role: UserRole = serde_json::from_str("\"Co-ordinator\"").expect("deserialize");
        assert_eq!(role, UserRole::Coordinator);
        assert_eq!(UserRole::parse("Co-ordinator"), Some(UserRole::Coordinator));
    }

    #[test]
    fn create_applies_payload_defaults() {
        let payload: CreateOrganizationRequest = serde_json::from_str(
            r#"{"name":"Acme","slug":"acme","organization_mail":"a@b.com","contact":"123"}"#,
        )
        .expect("deserialize");

        assert_eq!(payload.status, OrgStatus::Active);
        assert_eq!(
            payload.max_coordinators.as_deref(),
            Some("Upto 5 Coordinators")
        );
        assert_eq!(
            payload.timezone_name.as_deref(),
            Some("India Standard Time")
        );
        assert_eq!(payload.timezone_region.as_deref(), Some("Asia/Colombo"));
        assert_eq!(payload.language.as_deref(), Some("English"));
        assert_eq!(payload.website_url, None);
    }

    #[test]
    fn update_distinguishes_absent_from_null() {
        let payload: UpdateOrganizationRequest =
            serde_json::from_str(r#"{"name":"X","website_url":null,"logo_url":"http://l"}"#)
                .expect("deserialize");

        assert_eq!(payload.name.as_deref(), Some("X"));
        // Absent: leave untouched.
        assert_eq!(payload.phone_no, None);
        // Explicit null: clear the column.
        assert_eq!(payload.website_url, Some(None));
        // Value: overwrite.
        assert_eq!(payload.logo_url, Some(Some("http://l".to_string())));

        let payload: UpdateUserRequest =
            serde_json::from_str(r#"{"email":null}"#).expect("deserialize");
        assert_eq!(payload.email, Some(None));
        assert_eq!(payload.name, None);
    }

    #[test]
    fn empty_update_is_valid() {
        let payload: UpdateOrganizationRequest =
            serde_json::from_str("{}").expect("deserialize");
        assert!(payload.name.is_none());
        assert!(payload.website_url.is_none());

        let payload: UpdateUserRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(payload.name.is_none());
        assert!(payload.email.is_none());
    }

    #[test]
    fn invalid_enum_values_are_rejected() {
        assert!(serde_json::from_str::<UserRole>("\"Coordinator\"").is_err());
        assert!(serde_json::from_str::<OrgStatus>("\"Suspended\"").is_err());
    }
}
