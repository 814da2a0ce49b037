//! User administration handlers
//!
//! The whole group is admin-gated in the route layer.

use crate::api::handlers::AppState;
use crate::api::models::{
    ChangeRoleRequest, MessageResponse, UserActionResponse, UserListEnvelope, UserResponse,
};
use crate::core::error::{BoomError, Result};
use crate::core::uploads::read_photo_form;
use crate::db::models::Role;
use crate::db::repository::Repository;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

/// Handler for GET /api/users - All users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state
        .user_repo
        .find_all()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(UserListEnvelope { users }))
}

/// Handler for GET /api/users/search?email=... - Case-insensitive email search
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let pattern = params
        .get("email")
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            BoomError::InvalidRequest("Email query parameter is required".to_string())
        })?;

    let users = state
        .user_repo
        .search_by_email(pattern)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(UserListEnvelope { users }))
}

/// Handler for PATCH /api/users/:id/toggle-block - Flip the blocked flag
pub async fn toggle_block_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let mut user = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| BoomError::NotFound("User not found".to_string()))?;

    user.is_blocked = !user.is_blocked;
    state.user_repo.update(&user).await?;

    tracing::info!(user_id = %user.id, blocked = user.is_blocked, "User block toggled");

    let message = if user.is_blocked {
        "User blocked successfully"
    } else {
        "User unblocked successfully"
    };

    Ok(Json(UserActionResponse {
        message: message.to_string(),
        user: UserResponse::from(user),
    }))
}

/// Handler for PATCH /api/users/:id/role - Change a user's role
pub async fn change_user_role(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<impl IntoResponse> {
    let role = Role::parse(&req.role)
        .ok_or_else(|| BoomError::ValidationError(format!("Unknown role '{}'", req.role)))?;

    let mut user = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| BoomError::NotFound("User not found".to_string()))?;

    user.role = role;
    state.user_repo.update(&user).await?;

    tracing::info!(user_id = %user.id, role = %role, "User role changed");

    Ok(Json(UserActionResponse {
        message: "Role updated successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Handler for POST /api/users/:id/photos - Append uploaded photo URLs
pub async fn upload_user_photos(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut user = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| BoomError::NotFound("User not found".to_string()))?;

    let (_fields, photo_parts) =
        read_photo_form(&mut multipart, state.uploads.max_files()).await?;
    let urls = state.uploads.store_parts(&photo_parts).await?;

    user.photos.extend(urls);
    state.user_repo.update(&user).await?;

    tracing::info!(user_id = %user.id, photo_count = user.photos.len(), "User photos uploaded");

    Ok(Json(UserActionResponse {
        message: "Photos uploaded successfully".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Handler for DELETE /api/users/:id - Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| BoomError::NotFound("User not found".to_string()))?;

    state.user_repo.delete(&user_id).await?;

    tracing::info!(user_id = %user_id, "User deleted");

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
