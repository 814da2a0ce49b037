//! Database models
//!
//! Data structures representing database tables, plus the closed enums for
//! role and status columns. Status-like columns are stored as TEXT but only
//! the variants below are accepted, on the way in and on the way out.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Operator,
    Quest,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Operator => "operator",
            Role::Quest => "quest",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "client" => Some(Role::Client),
            "operator" => Some(Role::Operator),
            "quest" => Some(Role::Quest),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| Role::parse(s).ok_or(FromSqlError::InvalidType))
    }
}

/// Scheduling request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Closed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Open => "open",
            RequestStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(RequestStatus::Open),
            "closed" => Some(RequestStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for RequestStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RequestStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| RequestStatus::parse(s).ok_or(FromSqlError::InvalidType))
    }
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl ToSql for BookingStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BookingStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()
            .and_then(|s| BookingStatus::parse(s).ok_or(FromSqlError::InvalidType))
    }
}

/// Outbox notification status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "pending",
            NotificationStatus::Sent => "sent",
            NotificationStatus::Failed => "failed",
        }
    }
}

impl ToSql for NotificationStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for NotificationStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|s| match s {
            "pending" => Ok(NotificationStatus::Pending),
            "sent" => Ok(NotificationStatus::Sent),
            "failed" => Ok(NotificationStatus::Failed),
            _ => Err(FromSqlError::InvalidType),
        })
    }
}

/// User record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_blocked: bool,
    pub bonuses: i64,
    pub photos: Vec<String>,
    pub created_at: String,
}

/// Quest record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub owner_id: String,
    pub photos: Vec<String>,
    pub min_players: i64,
    pub max_players: i64,
    pub is_active: bool,
    pub created_at: String,
}

/// Scheduling request record in the database
///
/// `quest_id` is a soft reference: the quest may be hard-deleted afterwards
/// and the request keeps the dangling id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestRequest {
    pub id: String,
    pub from_user_id: String,
    pub text: String,
    pub quest_id: String,
    pub quest_date: String,
    pub quest_time: String,
    pub metro_branch: String,
    pub status: RequestStatus,
    pub created_at: String,
}

/// Comment record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub request_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: String,
}

/// Booking record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub quest_id: String,
    pub operator_id: String,
    pub client_id: String,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
    pub bonus_given: bool,
    pub photos: Vec<String>,
    pub created_at: String,
}

/// Outbox notification record in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: NotificationStatus,
    pub error: Option<String>,
    pub created_at: String,
    pub sent_at: Option<String>,
}

impl Notification {
    /// Create a pending notification addressed to one recipient
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            status: NotificationStatus::Pending,
            error: None,
            created_at: chrono::Utc::now().to_rfc3339(),
            sent_at: None,
        }
    }
}

/// Serialize a photo URL list into its TEXT column form
pub(crate) fn photos_to_json(photos: &[String]) -> String {
    serde_json::to_string(photos).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a photo URL list from its TEXT column form; bad data yields an empty list
pub(crate) fn photos_from_json(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Client, Role::Operator, Role::Quest, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superadmin"), None);
    }

    #[test]
    fn test_request_status_parse_is_strict() {
        assert_eq!(RequestStatus::parse("open"), Some(RequestStatus::Open));
        assert_eq!(RequestStatus::parse("closed"), Some(RequestStatus::Closed));
        assert_eq!(RequestStatus::parse("OPEN"), None);
        assert_eq!(RequestStatus::parse("done"), None);
    }

    #[test]
    fn test_role_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Operator).unwrap(), "\"operator\"");
        let parsed: Role = serde_json::from_str("\"quest\"").unwrap();
        assert_eq!(parsed, Role::Quest);
    }

    #[test]
    fn test_photos_json_round_trip() {
        let photos = vec!["http://x/uploads/a.jpg".to_string(), "http://x/uploads/b.png".to_string()];
        let raw = photos_to_json(&photos);
        assert_eq!(photos_from_json(Some(raw)), photos);
        assert!(photos_from_json(None).is_empty());
        assert!(photos_from_json(Some("not-json".to_string())).is_empty());
    }

    #[test]
    fn test_notification_new_is_pending() {
        let n = Notification::new("ops@example.com", "subject", "body");
        assert_eq!(n.status, NotificationStatus::Pending);
        assert!(n.error.is_none());
        assert!(n.sent_at.is_none());
        assert!(!n.id.is_empty());
    }
}
