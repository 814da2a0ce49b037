//! API handlers

pub mod bookings;
pub mod comments;
pub mod quests;
pub mod requests;
pub mod users;

pub use bookings::*;
pub use comments::*;
pub use quests::*;
pub use requests::*;
pub use users::*;

use crate::core::uploads::UploadStore;
use crate::db::repository::{
    BookingRepository, CommentRepository, NotificationRepository, QuestRepository,
    RequestRepository, UserRepository,
};
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub quest_repo: Arc<QuestRepository>,
    pub request_repo: Arc<RequestRepository>,
    pub comment_repo: Arc<CommentRepository>,
    pub booking_repo: Arc<BookingRepository>,
    pub notification_repo: Arc<NotificationRepository>,
    pub uploads: Arc<UploadStore>,
    pub jwt_secret: Arc<String>,
}
