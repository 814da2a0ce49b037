//! Database module
//!
//! Connection pool management, schema migrations, data models and the
//! repository layer.

pub mod manager;
pub mod migrations;
pub mod models;
pub mod repository;

pub use manager::DatabaseManager;
pub use models::{
    Booking, BookingStatus, Comment, Notification, NotificationStatus, Quest, QuestRequest,
    RequestStatus, Role, User,
};
pub use repository::{
    BookingRepository, CommentRepository, NotificationRepository, QuestRepository, Repository,
    RequestRepository, UserRepository,
};
