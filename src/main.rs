//! Quest Boom Backend
//!
//! Booking backend for quest games: operators file scheduling requests,
//! quest-runner staff pick them up, administrators run the catalogue.

use quest_boom::{api, core, db};

use anyhow::Result;
use quest_boom::core::notify::{build_mailer, OutboxWorker};
use quest_boom::db::repository::NotificationRepository;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Print to stderr since logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging system based on configuration
    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting Quest Boom Backend v{}", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(path = ?config.database.path, "Database configuration");

    // Initialize database (runs migrations)
    info!("Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size as u32,
        std::time::Duration::from_millis(config.database.busy_timeout),
    )?);
    info!("Database initialized successfully");

    // Ensure a bootstrap admin exists
    ensure_admin_user(db.clone()).await?;

    // Start the notification outbox worker
    let mailer = build_mailer(&config.smtp);
    let notification_repo = Arc::new(NotificationRepository::new(db.clone()));
    let outbox_worker = Arc::new(OutboxWorker::new(
        notification_repo,
        mailer,
        &config.outbox,
    ));
    let worker_handle = tokio::spawn(outbox_worker.clone().start());

    // Initialize and run the HTTP server
    info!("Initializing HTTP server...");
    let server_url = format!("http://{}:{}", config.server.host, config.server.port);
    let server = api::ApiServer::new(config, db)?;

    info!(url = %server_url, "Server ready - starting to serve requests");

    // Blocks until shutdown signal
    server.serve().await?;

    // Stop the outbox worker after the server drains
    outbox_worker.shutdown().await;
    let _ = worker_handle.await;

    Ok(())
}

/// Seed a default admin account on first start, otherwise nobody can create
/// quests or manage users.
async fn ensure_admin_user(db: Arc<db::DatabaseManager>) -> Result<()> {
    use quest_boom::auth::hash_password;
    use quest_boom::db::models::{Role, User};
    use quest_boom::db::repository::{Repository, UserRepository};
    use uuid::Uuid;

    let user_repo = UserRepository::new(db);
    let count = user_repo.count().await?;

    if count == 0 {
        info!("No users found, creating default admin user...");
        let password_hash = hash_password("admin123")?;
        let admin_user = User {
            id: Uuid::new_v4().to_string(),
            name: "Admin".to_string(),
            email: "admin@quest-boom.local".to_string(),
            password_hash,
            role: Role::Admin,
            is_blocked: false,
            bonuses: 0,
            photos: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        user_repo.create(&admin_user).await?;
        info!("Default admin user created: email='admin@quest-boom.local', password='admin123'");
    }

    Ok(())
}
