//! HTTP Server implementation
//!
//! Axum server with CORS, request tracing, trace-id propagation, static
//! serving of uploaded photos and graceful shutdown.

use crate::api::handlers::AppState;
use crate::api::middleware::trace_id_middleware;
use crate::api::routes::build_api_routes;
use crate::core::config::{Config, ServerConfig};
use crate::core::uploads::UploadStore;
use crate::db::manager::DatabaseManager;
use crate::db::repository::{
    BookingRepository, CommentRepository, NotificationRepository, QuestRepository,
    RequestRepository, UserRepository,
};
use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Self> {
        let server_config = config.server.clone();
        let router = Self::build_router(config, db)?;

        Ok(Self {
            router,
            config: server_config,
        })
    }

    /// Build the Axum router with all routes and middleware
    fn build_router(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Router> {
        let uploads = Arc::new(
            UploadStore::new(&config.storage)
                .map_err(|e| anyhow::anyhow!("Failed to create upload store: {}", e))?,
        );

        let app_state = AppState {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            quest_repo: Arc::new(QuestRepository::new(db.clone())),
            request_repo: Arc::new(RequestRepository::new(db.clone())),
            comment_repo: Arc::new(CommentRepository::new(db.clone())),
            booking_repo: Arc::new(BookingRepository::new(db.clone())),
            notification_repo: Arc::new(NotificationRepository::new(db)),
            uploads: uploads.clone(),
            jwt_secret: Arc::new(config.security.jwt_secret.clone()),
        };

        // Uploaded photos are served back from the same process
        let serve_uploads = ServeDir::new(uploads.root());

        // Multipart forms carry several photos, the default body cap is far
        // too small for them
        let body_limit = config.storage.max_file_size * config.storage.max_files_per_upload
            + 1024 * 1024;

        let router = build_api_routes(app_state)
            .nest_service("/uploads", serve_uploads)
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(trace_id_middleware))
                    .layer(TraceLayer::new_for_http())
                    .layer(Self::build_cors_layer(&config.security.allowed_origins))
                    .layer(DefaultBodyLimit::max(body_limit)),
            );

        Ok(router)
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        use tower_http::cors::Any;

        let cors = CorsLayer::new();

        if allowed_origins.contains(&"*".to_string()) {
            cors.allow_origin(Any).allow_methods(Any).allow_headers(Any)
        } else {
            let origins: Vec<axum::http::HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            cors.allow_origin(origins).allow_methods(Any).allow_headers(Any)
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// Blocks until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
