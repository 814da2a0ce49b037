//! Repository pattern implementation for the data access layer
//!
//! One repository per aggregate. Joins needed by the API (request creator,
//! selected quest, comment author, booking quest/operator) are expanded here
//! so handlers never issue follow-up queries per row.

use crate::core::error::{BoomError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{
    photos_from_json, photos_to_json, Booking, Comment, Notification, NotificationStatus, Quest,
    QuestRequest, RequestStatus, Role, User,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T>: Send + Sync {
    /// Find an entity by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<T>>;

    /// Find all entities
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<()>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<()>;

    /// Delete an entity by its ID
    async fn delete(&self, id: &str) -> Result<()>;
}

/// A joined pair of (name, email) from the users table
pub type UserRef = (String, String);

/// Quest columns joined onto a request: (id, title, description, photos)
pub type QuestRef = (String, String, String, Vec<String>);

/// Request row with its creator and quest expanded. Either side may be
/// missing when the referenced row was deleted.
pub type ExpandedRequest = (QuestRequest, Option<UserRef>, Option<QuestRef>);

/// Quest columns joined onto a booking:
/// (id, title, description, photos, min_players, max_players)
pub type BookingQuestRef = (String, String, String, Vec<String>, i64, i64);

/// Booking row with its quest and operator name expanded
pub type ExpandedBooking = (Booking, Option<BookingQuestRef>, Option<String>);

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, is_blocked, bonuses, photos, created_at";

fn read_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: row.get(4)?,
        is_blocked: row.get(5)?,
        bonuses: row.get(6)?,
        photos: photos_from_json(row.get(7)?),
        created_at: row.get(8)?,
    })
}

const QUEST_COLUMNS: &str =
    "id, title, description, owner_id, photos, min_players, max_players, is_active, created_at";

fn read_quest(row: &Row<'_>) -> rusqlite::Result<Quest> {
    Ok(Quest {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        owner_id: row.get(3)?,
        photos: photos_from_json(row.get(4)?),
        min_players: row.get(5)?,
        max_players: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
    })
}

const REQUEST_COLUMNS: &str =
    "id, from_user_id, text, quest_id, quest_date, quest_time, metro_branch, status, created_at";

fn read_request(row: &Row<'_>) -> rusqlite::Result<QuestRequest> {
    Ok(QuestRequest {
        id: row.get(0)?,
        from_user_id: row.get(1)?,
        text: row.get(2)?,
        quest_id: row.get(3)?,
        quest_date: row.get(4)?,
        quest_time: row.get(5)?,
        metro_branch: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn read_user_ref(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<UserRef>> {
    let name: Option<String> = row.get(offset)?;
    let email: Option<String> = row.get(offset + 1)?;
    Ok(name.zip(email))
}

fn read_quest_ref(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<QuestRef>> {
    let id: Option<String> = row.get(offset)?;
    Ok(match id {
        Some(id) => Some((
            id,
            row.get::<_, Option<String>>(offset + 1)?.unwrap_or_default(),
            row.get::<_, Option<String>>(offset + 2)?.unwrap_or_default(),
            photos_from_json(row.get(offset + 3)?),
        )),
        None => None,
    })
}

/// Repository for User entities
pub struct UserRepository {
    db: Arc<DatabaseManager>,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Find all users with the given role
    pub async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM users WHERE role = ? ORDER BY created_at ASC",
                        USER_COLUMNS
                    ))
                    .map_err(BoomError::DatabaseError)?;

                let users = stmt
                    .query_map([role], read_user)
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(users)
            })
            .await
    }

    /// Case-insensitive substring search on email
    pub async fn search_by_email(&self, pattern: &str) -> Result<Vec<User>> {
        let pattern = format!("%{}%", pattern.to_lowercase());
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM users WHERE lower(email) LIKE ? ORDER BY created_at ASC",
                        USER_COLUMNS
                    ))
                    .map_err(BoomError::DatabaseError)?;

                let users = stmt
                    .query_map([&pattern], read_user)
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(users)
            })
            .await
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        self.db
            .execute(|conn| {
                conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
                    .map_err(BoomError::DatabaseError)
            })
            .await
    }
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                    [&id],
                    read_user,
                )
                .optional()
                .map_err(BoomError::DatabaseError)
            })
            .await
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM users ORDER BY created_at ASC",
                        USER_COLUMNS
                    ))
                    .map_err(BoomError::DatabaseError)?;

                let users = stmt
                    .query_map([], read_user)
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(users)
            })
            .await
    }

    async fn create(&self, entity: &User) -> Result<()> {
        let user = entity.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO users (id, name, email, password_hash, role, is_blocked, bonuses, photos, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        user.id,
                        user.name,
                        user.email,
                        user.password_hash,
                        user.role,
                        user.is_blocked,
                        user.bonuses,
                        photos_to_json(&user.photos),
                        user.created_at,
                    ],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    async fn update(&self, entity: &User) -> Result<()> {
        let user = entity.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "UPDATE users SET name = ?1, email = ?2, password_hash = ?3, role = ?4, \
                     is_blocked = ?5, bonuses = ?6, photos = ?7 WHERE id = ?8",
                    params![
                        user.name,
                        user.email,
                        user.password_hash,
                        user.role,
                        user.is_blocked,
                        user.bonuses,
                        photos_to_json(&user.photos),
                        user.id,
                    ],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.execute("DELETE FROM users WHERE id = ?", [&id])
                    .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }
}

/// Repository for Quest entities
pub struct QuestRepository {
    db: Arc<DatabaseManager>,
}

impl QuestRepository {
    /// Create a new QuestRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub async fn create(&self, quest: &Quest) -> Result<()> {
        let quest = quest.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO quests (id, title, description, owner_id, photos, min_players, max_players, is_active, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        quest.id,
                        quest.title,
                        quest.description,
                        quest.owner_id,
                        photos_to_json(&quest.photos),
                        quest.min_players,
                        quest.max_players,
                        quest.is_active,
                        quest.created_at,
                    ],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Quest>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM quests WHERE id = ?", QUEST_COLUMNS),
                    [&id],
                    read_quest,
                )
                .optional()
                .map_err(BoomError::DatabaseError)
            })
            .await
    }

    /// All active quests with the owning user (name, email) expanded
    pub async fn find_active_expanded(&self) -> Result<Vec<(Quest, Option<UserRef>)>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT q.id, q.title, q.description, q.owner_id, q.photos, \
                         q.min_players, q.max_players, q.is_active, q.created_at, \
                         u.name, u.email \
                         FROM quests q LEFT JOIN users u ON q.owner_id = u.id \
                         WHERE q.is_active = 1 ORDER BY q.created_at ASC",
                    )
                    .map_err(BoomError::DatabaseError)?;

                let quests = stmt
                    .query_map([], |row| Ok((read_quest(row)?, read_user_ref(row, 9)?)))
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(quests)
            })
            .await
    }

    /// Hard delete. Requests and bookings referencing the quest are left
    /// untouched and keep their dangling quest id.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.execute("DELETE FROM quests WHERE id = ?", [&id])
                    .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }
}

fn insert_request(conn: &Connection, request: &QuestRequest) -> Result<()> {
    conn.execute(
        "INSERT INTO requests (id, from_user_id, text, quest_id, quest_date, quest_time, metro_branch, status, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            request.id,
            request.from_user_id,
            request.text,
            request.quest_id,
            request.quest_date,
            request.quest_time,
            request.metro_branch,
            request.status,
            request.created_at,
        ],
    )
    .map_err(BoomError::DatabaseError)?;
    Ok(())
}

const EXPANDED_REQUEST_QUERY: &str =
    "SELECT r.id, r.from_user_id, r.text, r.quest_id, r.quest_date, r.quest_time, \
     r.metro_branch, r.status, r.created_at, \
     u.name, u.email, \
     q.id, q.title, q.description, q.photos \
     FROM requests r \
     LEFT JOIN users u ON r.from_user_id = u.id \
     LEFT JOIN quests q ON r.quest_id = q.id";

fn read_expanded_request(row: &Row<'_>) -> rusqlite::Result<ExpandedRequest> {
    Ok((
        read_request(row)?,
        read_user_ref(row, 9)?,
        read_quest_ref(row, 11)?,
    ))
}

/// Repository for scheduling request entities
pub struct RequestRepository {
    db: Arc<DatabaseManager>,
}

impl RequestRepository {
    /// Create a new RequestRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Persist a request and enqueue its broadcast notifications in one
    /// transaction, so a failed insert never leaves stray outbox rows.
    pub async fn create_with_notifications(
        &self,
        request: &QuestRequest,
        notifications: &[Notification],
    ) -> Result<()> {
        let request = request.clone();
        let notifications = notifications.to_vec();
        self.db
            .transaction(move |tx| {
                insert_request(tx, &request)?;
                for notification in &notifications {
                    NotificationRepository::insert_in(tx, notification)?;
                }
                Ok(())
            })
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<QuestRequest>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM requests WHERE id = ?", REQUEST_COLUMNS),
                    [&id],
                    read_request,
                )
                .optional()
                .map_err(BoomError::DatabaseError)
            })
            .await
    }

    /// One request with creator and quest expanded
    pub async fn find_expanded(&self, id: &str) -> Result<Option<ExpandedRequest>> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("{} WHERE r.id = ?", EXPANDED_REQUEST_QUERY),
                    [&id],
                    read_expanded_request,
                )
                .optional()
                .map_err(BoomError::DatabaseError)
            })
            .await
    }

    /// All requests sorted by scheduled quest date ascending, with creator
    /// and quest expanded
    pub async fn find_all_expanded(&self) -> Result<Vec<ExpandedRequest>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "{} ORDER BY r.quest_date ASC, r.created_at ASC",
                        EXPANDED_REQUEST_QUERY
                    ))
                    .map_err(BoomError::DatabaseError)?;

                let requests = stmt
                    .query_map([], read_expanded_request)
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(requests)
            })
            .await
    }

    pub async fn update_status(&self, id: &str, status: RequestStatus) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "UPDATE requests SET status = ?1 WHERE id = ?2",
                    params![status, id],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    /// Close a request and enqueue the assignment notification in one
    /// transaction. Closing is unconditional: an already closed request
    /// stays closed.
    pub async fn close_with_notification(
        &self,
        id: &str,
        notification: &Notification,
    ) -> Result<()> {
        let id = id.to_string();
        let notification = notification.clone();
        self.db
            .transaction(move |tx| {
                tx.execute(
                    "UPDATE requests SET status = ?1 WHERE id = ?2",
                    params![RequestStatus::Closed, id],
                )
                .map_err(BoomError::DatabaseError)?;
                NotificationRepository::insert_in(tx, &notification)?;
                Ok(())
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.db
            .execute(move |conn| {
                conn.execute("DELETE FROM requests WHERE id = ?", [&id])
                    .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }
}

fn read_comment(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        request_id: row.get(1)?,
        author_id: row.get(2)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Repository for Comment entities
pub struct CommentRepository {
    db: Arc<DatabaseManager>,
}

impl CommentRepository {
    /// Create a new CommentRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Persist a comment and, when the request creator is known, enqueue the
    /// new-comment notification in the same transaction.
    pub async fn create_with_notification(
        &self,
        comment: &Comment,
        notification: Option<&Notification>,
    ) -> Result<()> {
        let comment = comment.clone();
        let notification = notification.cloned();
        self.db
            .transaction(move |tx| {
                tx.execute(
                    "INSERT INTO comments (id, request_id, author_id, text, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        comment.id,
                        comment.request_id,
                        comment.author_id,
                        comment.text,
                        comment.created_at,
                    ],
                )
                .map_err(BoomError::DatabaseError)?;

                if let Some(notification) = &notification {
                    NotificationRepository::insert_in(tx, notification)?;
                }
                Ok(())
            })
            .await
    }

    /// Comments for a request, oldest first, with author (name, email) expanded
    pub async fn find_by_request_expanded(
        &self,
        request_id: &str,
    ) -> Result<Vec<(Comment, Option<UserRef>)>> {
        let request_id = request_id.to_string();
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT c.id, c.request_id, c.author_id, c.text, c.created_at, \
                         u.name, u.email \
                         FROM comments c LEFT JOIN users u ON c.author_id = u.id \
                         WHERE c.request_id = ? ORDER BY c.created_at ASC",
                    )
                    .map_err(BoomError::DatabaseError)?;

                let comments = stmt
                    .query_map([&request_id], |row| {
                        Ok((read_comment(row)?, read_user_ref(row, 5)?))
                    })
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(comments)
            })
            .await
    }

    /// Whether the given user has authored at least one comment on the request
    pub async fn has_commented(&self, request_id: &str, author_id: &str) -> Result<bool> {
        let request_id = request_id.to_string();
        let author_id = author_id.to_string();
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM comments WHERE request_id = ?1 AND author_id = ?2)",
                    params![request_id, author_id],
                    |row| row.get(0),
                )
                .map_err(BoomError::DatabaseError)
            })
            .await
    }
}

fn read_booking(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        quest_id: row.get(1)?,
        operator_id: row.get(2)?,
        client_id: row.get(3)?,
        date: row.get(4)?,
        time: row.get(5)?,
        status: row.get(6)?,
        bonus_given: row.get(7)?,
        photos: photos_from_json(row.get(8)?),
        created_at: row.get(9)?,
    })
}

/// Repository for Booking entities. Bookings have no HTTP write path, this
/// repository only persists rows created by other systems and serves the
/// per-client listing.
pub struct BookingRepository {
    db: Arc<DatabaseManager>,
}

impl BookingRepository {
    /// Create a new BookingRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    pub async fn create(&self, booking: &Booking) -> Result<()> {
        let booking = booking.clone();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "INSERT INTO bookings (id, quest_id, operator_id, client_id, date, time, status, bonus_given, photos, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        booking.id,
                        booking.quest_id,
                        booking.operator_id,
                        booking.client_id,
                        booking.date,
                        booking.time,
                        booking.status,
                        booking.bonus_given,
                        photos_to_json(&booking.photos),
                        booking.created_at,
                    ],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    /// Bookings for a client, newest first, with quest details and operator
    /// name expanded
    pub async fn find_by_client_expanded(&self, client_id: &str) -> Result<Vec<ExpandedBooking>> {
        let client_id = client_id.to_string();
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT b.id, b.quest_id, b.operator_id, b.client_id, b.date, b.time, \
                         b.status, b.bonus_given, b.photos, b.created_at, \
                         q.id, q.title, q.description, q.photos, q.min_players, q.max_players, \
                         u.name \
                         FROM bookings b \
                         LEFT JOIN quests q ON b.quest_id = q.id \
                         LEFT JOIN users u ON b.operator_id = u.id \
                         WHERE b.client_id = ? ORDER BY b.created_at DESC",
                    )
                    .map_err(BoomError::DatabaseError)?;

                let bookings = stmt
                    .query_map([&client_id], |row| {
                        let booking = read_booking(row)?;
                        let quest = match row.get::<_, Option<String>>(10)? {
                            Some(id) => Some((
                                id,
                                row.get::<_, Option<String>>(11)?.unwrap_or_default(),
                                row.get::<_, Option<String>>(12)?.unwrap_or_default(),
                                photos_from_json(row.get(13)?),
                                row.get::<_, Option<i64>>(14)?.unwrap_or_default(),
                                row.get::<_, Option<i64>>(15)?.unwrap_or_default(),
                            )),
                            None => None,
                        };
                        let operator: Option<String> = row.get(16)?;
                        Ok((booking, quest, operator))
                    })
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(bookings)
            })
            .await
    }
}

const NOTIFICATION_COLUMNS: &str =
    "id, recipient, subject, body, status, error, created_at, sent_at";

fn read_notification(row: &Row<'_>) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        recipient: row.get(1)?,
        subject: row.get(2)?,
        body: row.get(3)?,
        status: row.get(4)?,
        error: row.get(5)?,
        created_at: row.get(6)?,
        sent_at: row.get(7)?,
    })
}

/// Repository for the notification outbox
pub struct NotificationRepository {
    db: Arc<DatabaseManager>,
}

impl NotificationRepository {
    /// Create a new NotificationRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// Insert an outbox row on an existing connection. Used by the domain
    /// repositories to enqueue inside their own transactions.
    pub fn insert_in(conn: &Connection, notification: &Notification) -> Result<()> {
        conn.execute(
            "INSERT INTO notifications (id, recipient, subject, body, status, error, created_at, sent_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                notification.id,
                notification.recipient,
                notification.subject,
                notification.body,
                notification.status,
                notification.error,
                notification.created_at,
                notification.sent_at,
            ],
        )
        .map_err(BoomError::DatabaseError)?;
        Ok(())
    }

    /// Enqueue a standalone notification outside any domain transaction
    pub async fn enqueue(&self, notification: &Notification) -> Result<()> {
        let notification = notification.clone();
        self.db
            .execute(move |conn| Self::insert_in(conn, &notification))
            .await
    }

    /// Pending notifications, oldest first
    pub async fn find_pending(&self, limit: usize) -> Result<Vec<Notification>> {
        self.db
            .execute(move |conn| {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM notifications WHERE status = 'pending' \
                         ORDER BY created_at ASC LIMIT ?",
                        NOTIFICATION_COLUMNS
                    ))
                    .map_err(BoomError::DatabaseError)?;

                let notifications = stmt
                    .query_map([limit as i64], read_notification)
                    .map_err(BoomError::DatabaseError)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(BoomError::DatabaseError)?;

                Ok(notifications)
            })
            .await
    }

    pub async fn mark_sent(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        let sent_at = chrono::Utc::now().to_rfc3339();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "UPDATE notifications SET status = ?1, sent_at = ?2 WHERE id = ?3",
                    params![NotificationStatus::Sent, sent_at, id],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    pub async fn mark_failed(&self, id: &str, error: &str) -> Result<()> {
        let id = id.to_string();
        let error = error.to_string();
        self.db
            .execute(move |conn| {
                conn.execute(
                    "UPDATE notifications SET status = ?1, error = ?2 WHERE id = ?3",
                    params![NotificationStatus::Failed, error, id],
                )
                .map_err(BoomError::DatabaseError)?;
                Ok(())
            })
            .await
    }

    /// Count outbox rows with the given status
    pub async fn count_with_status(&self, status: NotificationStatus) -> Result<i64> {
        self.db
            .execute(move |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM notifications WHERE status = ?",
                    [status],
                    |row| row.get(0),
                )
                .map_err(BoomError::DatabaseError)
            })
            .await
    }
}
