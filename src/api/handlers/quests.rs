//! Quest catalogue handlers
//!
//! Admins create and delete quests; the active catalogue is public.
//! Quest photos arrive as multipart parts and are stored through the
//! upload store before the record is persisted.

use crate::api::handlers::AppState;
use crate::api::models::{MessageResponse, QuestEnvelope, QuestListEnvelope, QuestResponse};
use crate::auth::middleware::AuthUser;
use crate::core::error::{BoomError, Result};
use crate::core::uploads::read_photo_form;
use crate::db::models::Quest;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

fn required_field(fields: &std::collections::HashMap<String, String>, name: &str) -> Result<String> {
    fields
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BoomError::InvalidRequest(format!("{} is required", name)))
}

fn player_count(fields: &std::collections::HashMap<String, String>, name: &str) -> Result<i64> {
    required_field(fields, name)?
        .parse::<i64>()
        .map_err(|_| BoomError::InvalidRequest(format!("{} must be a number", name)))
}

/// Handler for POST /api/quests - Create a quest (admin only, multipart)
pub async fn create_quest(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (fields, photo_parts) =
        read_photo_form(&mut multipart, state.uploads.max_files()).await?;

    let title = required_field(&fields, "title")?;
    let description = required_field(&fields, "description")?;
    let min_players = player_count(&fields, "minPlayers")?;
    let max_players = player_count(&fields, "maxPlayers")?;

    if min_players < 1 {
        return Err(BoomError::ValidationError(
            "minPlayers must be at least 1".to_string(),
        ));
    }
    if min_players > max_players {
        return Err(BoomError::ValidationError(
            "Minimum players cannot be greater than maximum players".to_string(),
        ));
    }

    // Validation happened first, so a rejected form leaves no files behind
    let photos = state.uploads.store_parts(&photo_parts).await?;

    let quest = Quest {
        id: Uuid::new_v4().to_string(),
        title,
        description,
        owner_id: user.id.clone(),
        photos,
        min_players,
        max_players,
        is_active: true,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.quest_repo.create(&quest).await?;

    tracing::info!(quest_id = %quest.id, owner_id = %user.id, "Quest created");

    let response = QuestResponse::from_expanded(quest, Some((user.name, user.email)));

    Ok((StatusCode::CREATED, Json(QuestEnvelope { quest: response })))
}

/// Handler for GET /api/quests - Public listing of active quests
pub async fn list_quests(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let quests = state
        .quest_repo
        .find_active_expanded()
        .await?
        .into_iter()
        .map(|(quest, owner)| QuestResponse::from_expanded(quest, owner))
        .collect();

    Ok(Json(QuestListEnvelope { quests }))
}

/// Handler for DELETE /api/quests/:id - Delete a quest (admin only)
///
/// Hard delete with no cascade: requests and bookings keep their dangling
/// quest reference and are shown with a null quest.
pub async fn delete_quest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state
        .quest_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Quest not found".to_string()))?;

    state.quest_repo.delete(&id).await?;

    tracing::info!(quest_id = %id, "Quest deleted");

    Ok(Json(MessageResponse::new("Quest deleted successfully")))
}
