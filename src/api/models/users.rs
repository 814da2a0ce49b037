//! User administration API models

use crate::db::models::{Role, User};
use serde::{Deserialize, Serialize};

/// Body for PATCH /api/users/:id/role
///
/// The role arrives as a raw string and is checked against the closed enum
/// explicitly, so an unknown role maps to 400.
#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// User info as exposed to administrators (no credential hash)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_blocked: bool,
    pub bonuses: i64,
    pub photos: Vec<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_blocked: user.is_blocked,
            bonuses: user.bonuses,
            photos: user.photos,
            created_at: user.created_at,
        }
    }
}

/// Envelope for GET /api/users and the email search
#[derive(Debug, Serialize)]
pub struct UserListEnvelope {
    pub users: Vec<UserResponse>,
}

/// Envelope for user mutations returning the updated record
#[derive(Debug, Serialize)]
pub struct UserActionResponse {
    pub message: String,
    pub user: UserResponse,
}
