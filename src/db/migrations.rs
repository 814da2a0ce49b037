//! Database migrations
//!
//! Versioned schema migrations applied in order inside a transaction, with
//! applied versions recorded in `schema_migrations`.

use crate::core::error::{BoomError, Result};
use rusqlite::Connection;
use tracing::{info, warn};

/// Migration version tracking table
const MIGRATION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Initial schema migration (version 1): domain tables
const MIGRATION_V1: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL,
    is_blocked INTEGER DEFAULT 0,
    bonuses INTEGER DEFAULT 0,
    photos TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Quests table
CREATE TABLE IF NOT EXISTS quests (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    owner_id TEXT NOT NULL,
    photos TEXT,
    min_players INTEGER NOT NULL,
    max_players INTEGER NOT NULL,
    is_active INTEGER DEFAULT 1,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Scheduling requests table. quest_id is a soft reference on purpose:
-- quests may be hard-deleted while their requests live on.
CREATE TABLE IF NOT EXISTS requests (
    id TEXT PRIMARY KEY,
    from_user_id TEXT NOT NULL,
    text TEXT NOT NULL,
    quest_id TEXT NOT NULL,
    quest_date TEXT NOT NULL,
    quest_time TEXT NOT NULL,
    metro_branch TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'open',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Comments on scheduling requests
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    request_id TEXT NOT NULL,
    author_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (request_id) REFERENCES requests(id) ON DELETE CASCADE
);

-- Bookings table. quest_id is a soft reference, same as requests.
CREATE TABLE IF NOT EXISTS bookings (
    id TEXT PRIMARY KEY,
    quest_id TEXT NOT NULL,
    operator_id TEXT NOT NULL,
    client_id TEXT NOT NULL,
    date TEXT NOT NULL,
    time TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    bonus_given INTEGER DEFAULT 0,
    photos TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_users_role ON users(role);
CREATE INDEX IF NOT EXISTS idx_requests_quest_date ON requests(quest_date);
CREATE INDEX IF NOT EXISTS idx_requests_status ON requests(status);
CREATE INDEX IF NOT EXISTS idx_comments_request_id ON comments(request_id, created_at);
CREATE INDEX IF NOT EXISTS idx_bookings_client_id ON bookings(client_id);
"#;

/// Second schema migration (version 2): notification outbox
const MIGRATION_V2: &str = r#"
CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    recipient TEXT NOT NULL,
    subject TEXT NOT NULL,
    body TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    error TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    sent_at DATETIME
);

CREATE INDEX IF NOT EXISTS idx_notifications_status ON notifications(status, created_at);
"#;

/// All migrations in application order
const MIGRATIONS: &[(i64, &str)] = &[(1, MIGRATION_V1), (2, MIGRATION_V2)];

/// Run all pending migrations
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(MIGRATION_TABLE)
        .map_err(BoomError::DatabaseError)?;

    let current = current_version(conn)?;

    for (version, sql) in MIGRATIONS {
        if *version > current {
            apply_migration(conn, *version, sql)?;
        }
    }

    Ok(())
}

/// Get the highest applied migration version
pub fn current_version(conn: &Connection) -> Result<i64> {
    let version: Option<i64> = conn
        .query_row(
            "SELECT MAX(version) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(BoomError::DatabaseError)?;

    Ok(version.unwrap_or(0))
}

/// Apply a single migration inside a transaction
fn apply_migration(conn: &mut Connection, version: i64, sql: &str) -> Result<()> {
    let tx = conn.transaction().map_err(BoomError::DatabaseError)?;

    tx.execute_batch(sql).map_err(|e| {
        warn!("Migration v{} failed: {}", version, e);
        BoomError::DatabaseError(e)
    })?;

    tx.execute("INSERT INTO schema_migrations (version) VALUES (?)", [version])
        .map_err(BoomError::DatabaseError)?;

    tx.commit().map_err(BoomError::DatabaseError)?;

    info!("Migration v{} applied successfully", version);
    Ok(())
}
