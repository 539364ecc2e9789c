use chrono::naive::serde::{ts_milliseconds, ts_seconds};
use chrono::NaiveDateTime;
use labfed_logger::error;
use schemars::{JsonSchema, JsonSchema_repr};
use sea_orm::{FromQueryResult, TryGetable};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::collections::HashMap;

#[derive(
    Serialize_repr, Deserialize_repr, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy,
    JsonSchema_repr,
)]
#[repr(i16)]
pub enum AccessLevel {
    Instructor = 0,
    Admin = 10,
}

impl From<i16> for AccessLevel {
    fn from(i: i16) -> Self {
        match i {
            0 => AccessLevel::Instructor,
            10 => AccessLevel::Admin,
            _ => {
                error!("invalid access level: {}", i);
                AccessLevel::Instructor
            }
        }
    }
}

impl TryGetable for AccessLevel {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let i: i16 = res.try_get_by(index).map_err(sea_orm::TryGetError::DbErr)?;
        Ok(AccessLevel::from(i))
    }

    fn try_get(
        res: &sea_orm::QueryResult,
        pre: &str,
        col: &str,
    ) -> Result<Self, sea_orm::TryGetError> {
        let i: i16 = res.try_get(pre, col).map_err(sea_orm::TryGetError::DbErr)?;
        Ok(AccessLevel::from(i))
    }

    fn try_get_by_index(
        res: &sea_orm::QueryResult,
        index: usize,
    ) -> Result<Self, sea_orm::TryGetError> {
        Self::try_get_by(res, index)
    }
}

impl AccessLevel {
    pub fn can_admin(&self) -> bool {
        *self >= Self::Admin
    }
}

/// Access status of a course permission. Requests start pending until an
/// administrator grants or denies them.
#[derive(
    Serialize_repr, Deserialize_repr, PartialEq, Eq, Debug, Clone, Copy, JsonSchema_repr,
)]
#[repr(i16)]
pub enum AccessStatus {
    Pending = 0,
    Granted = 1,
    Denied = 2,
}

impl From<i16> for AccessStatus {
    fn from(i: i16) -> Self {
        match i {
            0 => AccessStatus::Pending,
            1 => AccessStatus::Granted,
            2 => AccessStatus::Denied,
            _ => {
                error!("invalid access status: {}", i);
                AccessStatus::Pending
            }
        }
    }
}

impl TryGetable for AccessStatus {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let i: i16 = res.try_get_by(index).map_err(sea_orm::TryGetError::DbErr)?;
        Ok(AccessStatus::from(i))
    }

    fn try_get(
        res: &sea_orm::QueryResult,
        pre: &str,
        col: &str,
    ) -> Result<Self, sea_orm::TryGetError> {
        let i: i16 = res.try_get(pre, col).map_err(sea_orm::TryGetError::DbErr)?;
        Ok(AccessStatus::from(i))
    }

    fn try_get_by_index(
        res: &sea_orm::QueryResult,
        index: usize,
    ) -> Result<Self, sea_orm::TryGetError> {
        Self::try_get_by(res, index)
    }
}

impl AccessStatus {
    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: String,
    pub login: String,
    pub name: String,
    pub access_level: AccessLevel,
    pub lms_id: Option<String>,
    #[serde(with = "ts_milliseconds")]
    #[schemars(with = "i64")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserLogin {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateUser {
    pub login: String,
    pub name: String,
    pub password: String,
    pub access_level: AccessLevel,
    /// Target LMS. Only honored for callers not bound to an LMS themselves.
    #[serde(default)]
    pub lms_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub password: Option<String>,
    pub access_level: Option<AccessLevel>,
    /// Only honored for callers not bound to an LMS themselves.
    #[serde(default)]
    pub lms_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Claims {
    #[serde(with = "ts_seconds")]
    #[schemars(with = "i64")]
    pub exp: NaiveDateTime,
    #[serde(flatten)]
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserToken {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Lms {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(with = "ts_milliseconds")]
    #[schemars(with = "i64")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateLms {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LmsDetail {
    pub course_count: u64,
    pub credential_count: u64,
    #[serde(flatten)]
    pub lms: Lms,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Course {
    pub id: String,
    pub lms_id: String,
    pub context_id: String,
    pub name: String,
    #[serde(with = "ts_milliseconds")]
    #[schemars(with = "i64")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateCourse {
    pub context_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Rlms {
    pub id: String,
    pub kind: String,
    pub location: String,
    pub url: String,
    pub version: String,
    // provider specific JSON blob, None when absent or unparsable
    pub configuration: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateRlms {
    pub kind: String,
    pub location: String,
    pub url: String,
    pub version: String,
    pub configuration: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateRlms {
    pub location: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub configuration: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Laboratory {
    pub id: String,
    pub rlms_id: String,
    pub name: String,
    pub laboratory_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegisterLaboratory {
    pub name: String,
    pub laboratory_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LabGrant {
    pub id: String,
    pub lms_id: String,
    pub laboratory_id: String,
    pub local_identifier: String,
    pub configuration: Option<JsonValue>,
    #[serde(with = "ts_milliseconds")]
    #[schemars(with = "i64")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GrantLaboratory {
    pub laboratory_id: String,
    pub local_identifier: String,
    pub configuration: Option<JsonValue>,
}

#[derive(FromQueryResult, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LabGrantDetail {
    pub id: String,
    pub local_identifier: String,
    pub laboratory_name: String,
    pub external_laboratory_id: String,
    pub rlms_kind: String,
    pub rlms_location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CoursePermission {
    pub id: String,
    pub course_id: String,
    pub lab_permission_id: String,
    pub access: AccessStatus,
    pub configuration: Option<JsonValue>,
    #[serde(with = "ts_milliseconds")]
    #[schemars(with = "i64")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateCoursePermission {
    pub lab_permission_id: String,
    pub configuration: Option<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateAccess {
    pub access: AccessStatus,
}

#[derive(FromQueryResult, Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CourseLabAccess {
    pub permission_id: String,
    pub local_identifier: String,
    pub laboratory_name: String,
    pub access: AccessStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Credential {
    pub id: String,
    pub lms_id: String,
    pub key: String,
    pub kind: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateCredential {
    pub key: String,
    pub kind: String,
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmbedApplication {
    pub identifier: String,
    pub owner_id: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub height: Option<String>,
    pub scale: Option<i32>,
    pub age_ranges_range: Option<String>,
    pub domains_text: Option<String>,
    #[serde(with = "ts_milliseconds")]
    #[schemars(with = "i64")]
    pub last_update: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmbedTranslation {
    pub language: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmbedApplicationDetail {
    pub translations: Vec<EmbedTranslation>,
    #[serde(flatten)]
    pub application: EmbedApplication,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateEmbedApplication {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub height: Option<String>,
    /// Scale factor, e.g. 0.75; persisted as an integer percentage.
    pub scale: Option<f32>,
    pub age_ranges_range: Option<String>,
    pub domains_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateEmbedApplication {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub height: Option<String>,
    pub scale: Option<f32>,
    pub age_ranges_range: Option<String>,
    pub domains_text: Option<String>,
    /// Full language -> url set; languages missing from the map are removed.
    #[serde(default)]
    pub languages: HashMap<String, String>,
}

/// Scale factors arrive as floats from the editor but are stored as integer
/// percentages, matching the original console's behavior.
pub fn scale_percentage(scale: Option<f32>) -> Option<i32> {
    scale.map(|scale| (100.0 * scale) as i32)
}

pub(crate) fn parse_configuration(raw: Option<&str>) -> Option<JsonValue> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_percentage() {
        assert_eq!(scale_percentage(None), None);
        assert_eq!(scale_percentage(Some(0.75)), Some(75));
        assert_eq!(scale_percentage(Some(1.0)), Some(100));
        assert_eq!(scale_percentage(Some(1.25)), Some(125));
    }

    #[test]
    fn test_access_status_fallback() {
        assert_eq!(AccessStatus::from(1), AccessStatus::Granted);
        assert_eq!(AccessStatus::from(42), AccessStatus::Pending);
    }

    #[test]
    fn test_parse_configuration() {
        assert_eq!(parse_configuration(None), None);
        assert_eq!(parse_configuration(Some("not json")), None);
        assert_eq!(
            parse_configuration(Some(r#"{"remote_login":"weblabfed"}"#)),
            Some(serde_json::json!({"remote_login": "weblabfed"}))
        );
    }
}
