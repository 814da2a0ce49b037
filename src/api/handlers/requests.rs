//! Scheduling request handlers
//!
//! The request workflow: operators file scheduling requests against active
//! quests, quest staff get notified and comment, operators assign one of the
//! commenters. Role gating happens in the route layer.

use crate::api::handlers::AppState;
use crate::api::models::{
    AssignRequestRequest, CreateRequestRequest, QuestBrief, RequestEnvelope, RequestListEnvelope,
    RequestResponse, UpdateStatusRequest, UserBrief,
};
use crate::auth::middleware::AuthUser;
use crate::core::error::{BoomError, Result};
use crate::db::models::{Notification, QuestRequest, RequestStatus, Role};
use crate::db::repository::Repository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use uuid::Uuid;

/// Title shown when the referenced quest row no longer exists
const UNKNOWN_QUEST_TITLE: &str = "Неизвестный квест";

/// Handler for POST /api/requests - File a scheduling request (operator only)
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateRequestRequest>,
) -> Result<impl IntoResponse> {
    if req.text.trim().is_empty() {
        return Err(BoomError::InvalidRequest("text is required".to_string()));
    }

    if NaiveDate::parse_from_str(&req.quest_date, "%Y-%m-%d").is_err() {
        return Err(BoomError::InvalidRequest(
            "questDate must be a YYYY-MM-DD date".to_string(),
        ));
    }

    // The quest must exist and still be active
    let quest = state
        .quest_repo
        .find_by_id(&req.selected_quest)
        .await?
        .filter(|q| q.is_active)
        .ok_or_else(|| BoomError::InvalidRequest("Invalid quest selected".to_string()))?;

    let request = QuestRequest {
        id: Uuid::new_v4().to_string(),
        from_user_id: user.id.clone(),
        text: req.text.clone(),
        quest_id: quest.id.clone(),
        quest_date: req.quest_date.clone(),
        quest_time: req.quest_time.clone(),
        metro_branch: req.metro_branch.clone(),
        status: RequestStatus::Open,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    // Broadcast to every quest-runner; rows are enqueued in the same
    // transaction as the request insert
    let subject = "Новая заявка на квест";
    let body = format!(
        "Новая заявка на квест \"{}\" от оператора {}.\nДата: {}\nВремя: {}\nСтанция метро: {}\nТекст: {}",
        quest.title, user.name, req.quest_date, req.quest_time, req.metro_branch, req.text
    );
    let notifications: Vec<Notification> = state
        .user_repo
        .find_by_role(Role::Quest)
        .await?
        .into_iter()
        .map(|staff| Notification::new(staff.email, subject, body.clone()))
        .collect();

    state
        .request_repo
        .create_with_notifications(&request, &notifications)
        .await?;

    tracing::info!(
        request_id = %request.id,
        quest_id = %quest.id,
        operator_id = %user.id,
        recipients = notifications.len(),
        "Scheduling request created"
    );

    let response = RequestResponse {
        id: request.id,
        from: Some(UserBrief {
            id: user.id,
            name: user.name,
            email: user.email,
        }),
        text: request.text,
        selected_quest: Some(QuestBrief {
            id: quest.id,
            title: quest.title,
            description: quest.description,
            photos: quest.photos,
        }),
        quest_date: request.quest_date,
        quest_time: request.quest_time,
        metro_branch: request.metro_branch,
        status: request.status,
        created_at: request.created_at,
    };

    Ok((
        StatusCode::CREATED,
        Json(RequestEnvelope { request: response }),
    ))
}

/// Handler for GET /api/requests - List all requests (operator, quest, admin)
///
/// Sorted by scheduled quest date ascending. Requests whose quest has been
/// deleted are still listed, with a null quest reference.
pub async fn list_requests(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let requests = state
        .request_repo
        .find_all_expanded()
        .await?
        .into_iter()
        .map(RequestResponse::from_expanded)
        .collect();

    Ok(Json(RequestListEnvelope { requests }))
}

/// Handler for PATCH /api/requests/:id/status - Toggle request status (operator only)
pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse> {
    let status = RequestStatus::parse(&req.status).ok_or_else(|| {
        BoomError::ValidationError(format!(
            "status must be 'open' or 'closed', got '{}'",
            req.status
        ))
    })?;

    state
        .request_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Request not found".to_string()))?;

    state.request_repo.update_status(&id, status).await?;

    tracing::info!(request_id = %id, status = %status, "Request status updated");

    let expanded = state
        .request_repo
        .find_expanded(&id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Request not found".to_string()))?;

    Ok(Json(RequestEnvelope {
        request: RequestResponse::from_expanded(expanded),
    }))
}

/// Handler for POST /api/requests/:id/assign - Assign a quest-runner (operator only)
///
/// The target must have commented on the request. Assignment closes the
/// request whatever its current status, and the assignee is notified.
pub async fn assign_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequestRequest>,
) -> Result<impl IntoResponse> {
    let request = state
        .request_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Request not found".to_string()))?;

    let target = state
        .user_repo
        .find_by_id(&req.target_user_id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Target user not found".to_string()))?;

    if !state.comment_repo.has_commented(&id, &target.id).await? {
        return Err(BoomError::ValidationError(
            "Target user has not commented on this request".to_string(),
        ));
    }

    let quest_title = state
        .quest_repo
        .find_by_id(&request.quest_id)
        .await?
        .map(|q| q.title)
        .unwrap_or_else(|| UNKNOWN_QUEST_TITLE.to_string());

    let notification = Notification::new(
        target.email.clone(),
        "Вас назначили на проведение квеста",
        format!(
            "Здравствуйте, {}!\n\nВас выбрали для проведения квеста \"{}\" в {} в {}.\n\nУдачи!",
            target.name, quest_title, request.quest_date, request.quest_time
        ),
    );

    state
        .request_repo
        .close_with_notification(&id, &notification)
        .await?;

    tracing::info!(
        request_id = %id,
        target_user_id = %target.id,
        "Request assigned and closed"
    );

    let expanded = state
        .request_repo
        .find_expanded(&id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Request not found".to_string()))?;

    Ok(Json(RequestEnvelope {
        request: RequestResponse::from_expanded(expanded),
    }))
}

/// Handler for DELETE /api/requests/:id - Delete a request (admin only)
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state
        .request_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Request not found".to_string()))?;

    state.request_repo.delete(&id).await?;

    tracing::info!(request_id = %id, "Request deleted");

    Ok(Json(crate::api::models::MessageResponse::new(
        "Request deleted successfully",
    )))
}
