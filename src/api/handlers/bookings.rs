//! Booking handlers
//!
//! Bookings are read-only over HTTP: there is no creation or status
//! transition endpoint, rows are written by other systems.

use crate::api::handlers::AppState;
use crate::api::models::{BookingListEnvelope, BookingResponse};
use crate::auth::middleware::AuthUser;
use crate::core::error::Result;
use axum::{extract::State, response::IntoResponse, Json};

/// Handler for GET /api/bookings/my-bookings - Caller's bookings, newest first
pub async fn my_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse> {
    let bookings = state
        .booking_repo
        .find_by_client_expanded(&user.id)
        .await?
        .into_iter()
        .map(BookingResponse::from_expanded)
        .collect();

    Ok(Json(BookingListEnvelope { bookings }))
}
