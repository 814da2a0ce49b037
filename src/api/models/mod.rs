//! API request/response models

pub mod bookings;
pub mod comments;
pub mod common;
pub mod quests;
pub mod requests;
pub mod users;

pub use bookings::*;
pub use comments::*;
pub use common::*;
pub use quests::*;
pub use requests::*;
pub use users::*;
