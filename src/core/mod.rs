//! Core module
//!
//! Shared infrastructure: configuration, error types, logging, notification
//! delivery and upload storage.

pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod uploads;

pub use config::Config;
pub use error::{BoomError, ErrorResponse};
pub use logging::Logger;
pub use notify::{build_mailer, Mailer, NoopMailer, OutboxWorker, SmtpMailer};
pub use uploads::UploadStore;
