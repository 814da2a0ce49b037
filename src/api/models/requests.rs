//! Scheduling request API models

use crate::api::models::common::{QuestBrief, UserBrief};
use crate::db::models::RequestStatus;
use crate::db::repository::ExpandedRequest;
use serde::{Deserialize, Serialize};

/// Body for POST /api/requests
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestRequest {
    pub selected_quest: String,
    pub text: String,
    pub quest_date: String,
    pub quest_time: String,
    pub metro_branch: String,
}

/// Body for PATCH /api/requests/:id/status
///
/// The status arrives as a raw string and is checked against the closed
/// enum explicitly, so an unknown value maps to 400 instead of a generic
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Body for POST /api/requests/:id/assign
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequestRequest {
    pub target_user_id: String,
}

/// Scheduling request with creator and quest expanded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub id: String,
    pub from: Option<UserBrief>,
    pub text: String,
    pub selected_quest: Option<QuestBrief>,
    pub quest_date: String,
    pub quest_time: String,
    pub metro_branch: String,
    pub status: RequestStatus,
    pub created_at: String,
}

impl RequestResponse {
    pub fn from_expanded(expanded: ExpandedRequest) -> Self {
        let (request, from, quest) = expanded;
        Self {
            id: request.id,
            from: UserBrief::from_ref(&request.from_user_id, from),
            text: request.text,
            selected_quest: QuestBrief::from_ref(quest),
            quest_date: request.quest_date,
            quest_time: request.quest_time,
            metro_branch: request.metro_branch,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

/// Envelope for single-request responses
#[derive(Debug, Serialize)]
pub struct RequestEnvelope {
    pub request: RequestResponse,
}

/// Envelope for GET /api/requests
#[derive(Debug, Serialize)]
pub struct RequestListEnvelope {
    pub requests: Vec<RequestResponse>,
}
