//! HTTP API module
//!
//! Server setup, routing, middleware, handlers and wire models.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
