//! Booking API models

use crate::db::models::BookingStatus;
use crate::db::repository::ExpandedBooking;
use serde::Serialize;

/// Quest details joined onto a booking
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuestBrief {
    pub id: String,
    pub title: String,
    pub description: String,
    pub photos: Vec<String>,
    pub min_players: i64,
    pub max_players: i64,
}

/// Operator reference on a booking
#[derive(Debug, Serialize)]
pub struct BookingOperatorBrief {
    pub id: String,
    pub name: String,
}

/// Booking with quest and operator expanded
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub quest: Option<BookingQuestBrief>,
    pub operator: Option<BookingOperatorBrief>,
    pub client: String,
    pub date: String,
    pub time: String,
    pub status: BookingStatus,
    pub bonus_given: bool,
    pub photos: Vec<String>,
    pub created_at: String,
}

impl BookingResponse {
    pub fn from_expanded(expanded: ExpandedBooking) -> Self {
        let (booking, quest, operator_name) = expanded;
        Self {
            id: booking.id,
            quest: quest.map(
                |(id, title, description, photos, min_players, max_players)| BookingQuestBrief {
                    id,
                    title,
                    description,
                    photos,
                    min_players,
                    max_players,
                },
            ),
            operator: operator_name.map(|name| BookingOperatorBrief {
                id: booking.operator_id.clone(),
                name,
            }),
            client: booking.client_id,
            date: booking.date,
            time: booking.time,
            status: booking.status,
            bonus_given: booking.bonus_given,
            photos: booking.photos,
            created_at: booking.created_at,
        }
    }
}

/// Envelope for GET /api/bookings/my-bookings
#[derive(Debug, Serialize)]
pub struct BookingListEnvelope {
    pub bookings: Vec<BookingResponse>,
}
