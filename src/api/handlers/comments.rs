//! Comment handlers
//!
//! Quest staff comment on scheduling requests; the request creator is
//! notified of each new comment. Role gating happens in the route layer.

use crate::api::handlers::AppState;
use crate::api::models::{
    CommentEnvelope, CommentListEnvelope, CommentResponse, CreateCommentRequest, UserBrief,
};
use crate::auth::middleware::AuthUser;
use crate::core::error::{BoomError, Result};
use crate::db::models::{Comment, Notification};
use crate::db::repository::Repository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Handler for POST /api/comments - Comment on a request (quest staff only)
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    if req.text.trim().is_empty() {
        return Err(BoomError::InvalidRequest("text is required".to_string()));
    }

    let request = state
        .request_repo
        .find_by_id(&req.request_id)
        .await?
        .ok_or_else(|| BoomError::NotFound("Request not found".to_string()))?;

    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        request_id: request.id.clone(),
        author_id: user.id.clone(),
        text: req.text.clone(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    // Notify the request creator, when that account still exists
    let notification = match state.user_repo.find_by_id(&request.from_user_id).await? {
        Some(creator) => {
            let quest_title = state
                .quest_repo
                .find_by_id(&request.quest_id)
                .await?
                .map(|q| q.title)
                .unwrap_or_else(|| "Неизвестный квест".to_string());
            Some(Notification::new(
                creator.email,
                "Новый комментарий к вашей заявке",
                format!(
                    "К вашей заявке \"{}\" добавлен новый комментарий от {}:\n\n{}\n\nДата: {}",
                    quest_title, user.name, req.text, comment.created_at
                ),
            ))
        }
        None => None,
    };

    state
        .comment_repo
        .create_with_notification(&comment, notification.as_ref())
        .await?;

    tracing::info!(
        comment_id = %comment.id,
        request_id = %request.id,
        author_id = %user.id,
        "Comment created"
    );

    let response = CommentResponse {
        id: comment.id,
        request: comment.request_id,
        author: Some(UserBrief {
            id: user.id,
            name: user.name,
            email: user.email,
        }),
        text: comment.text,
        created_at: comment.created_at,
    };

    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope { comment: response }),
    ))
}

/// Handler for GET /api/comments/:requestId - Comment thread (quest, operator)
///
/// Oldest first, chat style.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<impl IntoResponse> {
    let comments = state
        .comment_repo
        .find_by_request_expanded(&request_id)
        .await?
        .into_iter()
        .map(|(comment, author)| CommentResponse::from_expanded(comment, author))
        .collect();

    Ok(Json(CommentListEnvelope { comments }))
}
