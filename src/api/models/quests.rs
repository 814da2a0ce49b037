//! Quest API models

use crate::api::models::common::UserBrief;
use crate::db::models::Quest;
use crate::db::repository::UserRef;
use serde::Serialize;

/// Quest with its owner expanded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub owner: Option<UserBrief>,
    pub photos: Vec<String>,
    pub min_players: i64,
    pub max_players: i64,
    pub is_active: bool,
    pub created_at: String,
}

impl QuestResponse {
    pub fn from_expanded(quest: Quest, owner: Option<UserRef>) -> Self {
        Self {
            id: quest.id,
            title: quest.title,
            description: quest.description,
            owner: UserBrief::from_ref(&quest.owner_id, owner),
            photos: quest.photos,
            min_players: quest.min_players,
            max_players: quest.max_players,
            is_active: quest.is_active,
            created_at: quest.created_at,
        }
    }
}

/// Envelope for single-quest responses
#[derive(Debug, Serialize)]
pub struct QuestEnvelope {
    pub quest: QuestResponse,
}

/// Envelope for GET /api/quests
#[derive(Debug, Serialize)]
pub struct QuestListEnvelope {
    pub quests: Vec<QuestResponse>,
}
