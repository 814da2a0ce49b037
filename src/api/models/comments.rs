//! Comment API models

use crate::api::models::common::UserBrief;
use crate::db::models::Comment;
use crate::db::repository::UserRef;
use serde::{Deserialize, Serialize};

/// Body for POST /api/comments
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub request_id: String,
    pub text: String,
}

/// Comment with its author expanded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub request: String,
    pub author: Option<UserBrief>,
    pub text: String,
    pub created_at: String,
}

impl CommentResponse {
    pub fn from_expanded(comment: Comment, author: Option<UserRef>) -> Self {
        Self {
            id: comment.id,
            request: comment.request_id,
            author: UserBrief::from_ref(&comment.author_id, author),
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// Envelope for single-comment responses
#[derive(Debug, Serialize)]
pub struct CommentEnvelope {
    pub comment: CommentResponse,
}

/// Envelope for GET /api/comments/:requestId
#[derive(Debug, Serialize)]
pub struct CommentListEnvelope {
    pub comments: Vec<CommentResponse>,
}
