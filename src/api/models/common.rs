//! Shared API response fragments

use crate::db::repository::{QuestRef, UserRef};
use serde::Serialize;

/// Expanded user reference (creator, author, owner)
#[derive(Debug, Serialize)]
pub struct UserBrief {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserBrief {
    pub fn from_ref(id: &str, user: Option<UserRef>) -> Option<Self> {
        user.map(|(name, email)| Self {
            id: id.to_string(),
            name,
            email,
        })
    }
}

/// Expanded quest reference on a request
#[derive(Debug, Serialize)]
pub struct QuestBrief {
    pub id: String,
    pub title: String,
    pub description: String,
    pub photos: Vec<String>,
}

impl QuestBrief {
    pub fn from_ref(quest: Option<QuestRef>) -> Option<Self> {
        quest.map(|(id, title, description, photos)| Self {
            id,
            title,
            description,
            photos,
        })
    }
}

/// Generic action response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
