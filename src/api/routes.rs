//! API routes
//!
//! Role gating is declared here, once per route group, instead of being
//! re-checked inside every handler. The groups are layered inside the
//! authentication middleware so the resolved user is always available to
//! the guards.

use crate::api::handlers::{
    assign_request, change_user_role, create_comment, create_quest, create_request,
    delete_quest, delete_request, delete_user, list_comments, list_quests, list_requests,
    list_users, my_bookings, search_users, toggle_block_user, update_request_status,
    upload_user_photos, AppState,
};
use crate::auth::middleware::{authenticate, require_roles};
use crate::db::models::Role;
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

const REQUEST_READERS: &[Role] = &[Role::Operator, Role::Quest, Role::Admin];
const COMMENT_READERS: &[Role] = &[Role::Quest, Role::Operator];

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/quests", get(list_quests));

    // Operator-only request workflow
    let operator_routes = Router::new()
        .route("/api/requests", post(create_request))
        .route("/api/requests/:id/status", patch(update_request_status))
        .route("/api/requests/:id/assign", post(assign_request))
        .route_layer(middleware::from_fn(require_roles(&[Role::Operator])));

    // Request listing is shared between operators, quest staff and admins
    let request_reader_routes = Router::new()
        .route("/api/requests", get(list_requests))
        .route_layer(middleware::from_fn(require_roles(REQUEST_READERS)));

    // Only quest staff may comment
    let quest_staff_routes = Router::new()
        .route("/api/comments", post(create_comment))
        .route_layer(middleware::from_fn(require_roles(&[Role::Quest])));

    // Comment threads are visible to quest staff and operators
    let comment_reader_routes = Router::new()
        .route("/api/comments/:requestId", get(list_comments))
        .route_layer(middleware::from_fn(require_roles(COMMENT_READERS)));

    // Admin surface: request deletion, quest CRUD, user administration
    let admin_routes = Router::new()
        .route("/api/requests/:id", delete(delete_request))
        .route("/api/quests", post(create_quest))
        .route("/api/quests/:id", delete(delete_quest))
        .route("/api/users", get(list_users))
        .route("/api/users/search", get(search_users))
        .route("/api/users/:userId/toggle-block", patch(toggle_block_user))
        .route("/api/users/:userId/role", patch(change_user_role))
        .route("/api/users/:userId/photos", post(upload_user_photos))
        .route("/api/users/:userId", delete(delete_user))
        .route_layer(middleware::from_fn(require_roles(&[Role::Admin])));

    // Any authenticated user, scoped to self
    let authenticated_routes = Router::new().route("/api/bookings/my-bookings", get(my_bookings));

    let protected_routes = operator_routes
        .merge(request_reader_routes)
        .merge(quest_staff_routes)
        .merge(comment_reader_routes)
        .merge(admin_routes)
        .merge(authenticated_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    public_routes.merge(protected_routes).with_state(state)
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::generate_token;
    use crate::core::config::StorageConfig;
    use crate::core::uploads::UploadStore;
    use crate::db::manager::DatabaseManager;
    use crate::db::models::{
        Booking, BookingStatus, Comment, Quest, QuestRequest, RequestStatus, User,
    };
    use crate::db::repository::{
        BookingRepository, CommentRepository, NotificationRepository, QuestRepository,
        Repository, RequestRepository, UserRepository,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-secret";
    const BOUNDARY: &str = "X-QUEST-BOOM-TEST-BOUNDARY";

    fn test_state(temp_dir: &TempDir) -> AppState {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let uploads = UploadStore::new(&StorageConfig {
            upload_dir: temp_dir.path().join("uploads"),
            public_base_url: "http://127.0.0.1:5000".to_string(),
            max_file_size: 5 * 1024 * 1024,
            max_files_per_upload: 10,
        })
        .unwrap();

        AppState {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            quest_repo: Arc::new(QuestRepository::new(db.clone())),
            request_repo: Arc::new(RequestRepository::new(db.clone())),
            comment_repo: Arc::new(CommentRepository::new(db.clone())),
            booking_repo: Arc::new(BookingRepository::new(db.clone())),
            notification_repo: Arc::new(NotificationRepository::new(db)),
            uploads: Arc::new(uploads),
            jwt_secret: Arc::new(TEST_SECRET.to_string()),
        }
    }

    /// Create a user and mint a bearer token for them
    async fn seed_user(state: &AppState, id: &str, email: &str, role: Role) -> String {
        state
            .user_repo
            .create(&User {
                id: id.to_string(),
                name: format!("user-{}", id),
                email: email.to_string(),
                password_hash: "external-credential-hash".to_string(),
                role,
                is_blocked: false,
                bonuses: 0,
                photos: Vec::new(),
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .unwrap();
        generate_token(id, TEST_SECRET).unwrap()
    }

    async fn seed_quest(state: &AppState, id: &str, title: &str) {
        state
            .quest_repo
            .create(&Quest {
                id: id.to_string(),
                title: title.to_string(),
                description: "a quest".to_string(),
                owner_id: "admin-1".to_string(),
                photos: Vec::new(),
                min_players: 2,
                max_players: 6,
                is_active: true,
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .unwrap();
    }

    async fn seed_request(state: &AppState, id: &str, quest_id: &str, quest_date: &str) {
        state
            .request_repo
            .create_with_notifications(
                &QuestRequest {
                    id: id.to_string(),
                    from_user_id: "op-1".to_string(),
                    text: "evening slot".to_string(),
                    quest_id: quest_id.to_string(),
                    quest_date: quest_date.to_string(),
                    quest_time: "18:00".to_string(),
                    metro_branch: "Central".to_string(),
                    status: RequestStatus::Open,
                    created_at: chrono::Utc::now().to_rfc3339(),
                },
                &[],
            )
            .await
            .unwrap();
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    fn multipart_quest_body(title: &str, min_players: &str, max_players: &str) -> String {
        let mut body = String::new();
        for (name, value) in [
            ("title", title),
            ("description", "A classic escape room"),
            ("minPlayers", min_players),
            ("maxPlayers", max_players),
        ] {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    async fn send_multipart(
        router: &Router,
        uri: &str,
        token: &str,
        body: String,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Authorization", format!("Bearer {}", token))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let temp_dir = TempDir::new().unwrap();
        let router = build_api_routes(test_state(&temp_dir));

        let (status, body) = send(&router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let temp_dir = TempDir::new().unwrap();
        let router = build_api_routes(test_state(&temp_dir));

        let (status, body) = send(&router, "GET", "/api/requests", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "AuthenticationError");

        let (status, _) = send(
            &router,
            "GET",
            "/api/requests",
            Some("not-a-real-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_request_forbidden_for_non_operators() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let admin = seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;
        let staff = seed_user(&state, "staff-1", "staff@x.io", Role::Quest).await;
        let client = seed_user(&state, "client-1", "client@x.io", Role::Client).await;
        seed_quest(&state, "q-1", "Escape Room").await;

        let body = serde_json::json!({
            "selectedQuest": "q-1",
            "text": "please schedule",
            "questDate": "2024-06-01",
            "questTime": "18:00",
            "metroBranch": "Central"
        });

        for token in [&admin, &staff, &client] {
            let (status, resp) =
                send(&router, "POST", "/api/requests", Some(token), Some(body.clone())).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(resp["error"], "PermissionDenied");
        }
    }

    #[tokio::test]
    async fn test_full_workflow_scenario() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let admin = seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;
        let operator = seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        let staff = seed_user(&state, "staff-1", "staff@x.io", Role::Quest).await;
        let _other_staff = seed_user(&state, "staff-2", "staff2@x.io", Role::Quest).await;

        // Admin creates the quest
        let (status, body) = send_multipart(
            &router,
            "/api/quests",
            &admin,
            multipart_quest_body("Escape Room", "2", "6"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["quest"]["isActive"], true);
        let quest_id = body["quest"]["id"].as_str().unwrap().to_string();

        // Operator files a request against it
        let (status, body) = send(
            &router,
            "POST",
            "/api/requests",
            Some(&operator),
            Some(serde_json::json!({
                "selectedQuest": quest_id,
                "text": "birthday party",
                "questDate": "2024-06-01",
                "questTime": "18:00",
                "metroBranch": "Central"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["request"]["status"], "open");
        let request_id = body["request"]["id"].as_str().unwrap().to_string();

        // Both quest-role users got a broadcast row in the outbox
        let pending = state.notification_repo.find_pending(10).await.unwrap();
        let recipients: Vec<&str> = pending.iter().map(|n| n.recipient.as_str()).collect();
        assert!(recipients.contains(&"staff@x.io"));
        assert!(recipients.contains(&"staff2@x.io"));

        // A quest-runner comments
        let (status, body) = send(
            &router,
            "POST",
            "/api/comments",
            Some(&staff),
            Some(serde_json::json!({ "requestId": request_id, "text": "I'm available" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["comment"]["author"]["email"], "staff@x.io");

        // The operator sees the thread
        let (status, body) = send(
            &router,
            "GET",
            &format!("/api/comments/{}", request_id),
            Some(&operator),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comments"].as_array().unwrap().len(), 1);

        // The operator assigns the commenter, closing the request
        let (status, body) = send(
            &router,
            "POST",
            &format!("/api/requests/{}/assign", request_id),
            Some(&operator),
            Some(serde_json::json!({ "targetUserId": "staff-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request"]["status"], "closed");

        // The assignee has a notification waiting in the outbox
        let pending = state.notification_repo.find_pending(10).await.unwrap();
        assert!(pending.iter().any(|n| {
            n.recipient == "staff@x.io" && n.subject.contains("назначили")
        }));
    }

    #[tokio::test]
    async fn test_status_round_trip_and_strict_values() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let operator = seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        seed_request(&state, "r-1", "q-1", "2024-06-01").await;

        let (status, body) = send(
            &router,
            "PATCH",
            "/api/requests/r-1/status",
            Some(&operator),
            Some(serde_json::json!({ "status": "closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request"]["status"], "closed");

        let (status, body) = send(
            &router,
            "PATCH",
            "/api/requests/r-1/status",
            Some(&operator),
            Some(serde_json::json!({ "status": "open" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request"]["status"], "open");

        // Anything outside the closed enum is rejected, nothing changes
        let (status, body) = send(
            &router,
            "PATCH",
            "/api/requests/r-1/status",
            Some(&operator),
            Some(serde_json::json!({ "status": "reopened" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(
            state
                .request_repo
                .find_by_id("r-1")
                .await
                .unwrap()
                .unwrap()
                .status,
            RequestStatus::Open
        );

        let (status, _) = send(
            &router,
            "PATCH",
            "/api/requests/missing/status",
            Some(&operator),
            Some(serde_json::json!({ "status": "closed" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_assign_closes_regardless_of_prior_status() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let operator = seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        seed_user(&state, "staff-1", "staff@x.io", Role::Quest).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        seed_request(&state, "r-1", "q-1", "2024-06-01").await;

        state
            .comment_repo
            .create_with_notification(
                &Comment {
                    id: "c-1".to_string(),
                    request_id: "r-1".to_string(),
                    author_id: "staff-1".to_string(),
                    text: "count me in".to_string(),
                    created_at: chrono::Utc::now().to_rfc3339(),
                },
                None,
            )
            .await
            .unwrap();

        // Close the request first; assigning must keep it closed
        state
            .request_repo
            .update_status("r-1", RequestStatus::Closed)
            .await
            .unwrap();

        let (status, body) = send(
            &router,
            "POST",
            "/api/requests/r-1/assign",
            Some(&operator),
            Some(serde_json::json!({ "targetUserId": "staff-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["request"]["status"], "closed");
    }

    #[tokio::test]
    async fn test_assign_requires_an_existing_comment() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let operator = seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        seed_user(&state, "staff-1", "staff@x.io", Role::Quest).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        seed_request(&state, "r-1", "q-1", "2024-06-01").await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/requests/r-1/assign",
            Some(&operator),
            Some(serde_json::json!({ "targetUserId": "staff-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        let (status, _) = send(
            &router,
            "POST",
            "/api/requests/r-1/assign",
            Some(&operator),
            Some(serde_json::json!({ "targetUserId": "nobody" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requests_listed_by_quest_date() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let staff = seed_user(&state, "staff-1", "staff@x.io", Role::Quest).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        seed_request(&state, "r-late", "q-1", "2024-08-20").await;
        seed_request(&state, "r-early", "q-1", "2024-06-01").await;
        seed_request(&state, "r-mid", "q-1", "2024-07-10").await;

        let (status, body) = send(&router, "GET", "/api/requests", Some(&staff), None).await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<&str> = body["requests"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["r-early", "r-mid", "r-late"]);
    }

    #[tokio::test]
    async fn test_create_quest_rejects_inverted_player_range() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let admin = seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;

        let (status, body) = send_multipart(
            &router,
            "/api/quests",
            &admin,
            multipart_quest_body("Bad Range", "5", "2"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        // Nothing was persisted
        let (status, body) = send(&router, "GET", "/api/quests", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["quests"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_quest_leaves_request_with_null_quest() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let admin = seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;
        seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        seed_request(&state, "r-1", "q-1", "2024-06-01").await;

        let (status, _) = send(&router, "DELETE", "/api/quests/q-1", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, "GET", "/api/requests", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let requests = body["requests"].as_array().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["id"], "r-1");
        assert!(requests[0]["selectedQuest"].is_null());
        assert_eq!(requests[0]["from"]["email"], "op@x.io");
    }

    #[tokio::test]
    async fn test_request_deletion_is_admin_only() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let admin = seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;
        let operator = seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        seed_request(&state, "r-1", "q-1", "2024-06-01").await;

        let (status, _) = send(&router, "DELETE", "/api/requests/r-1", Some(&operator), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&router, "DELETE", "/api/requests/r-1", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.request_repo.find_by_id("r-1").await.unwrap().is_none());

        let (status, _) = send(&router, "DELETE", "/api/requests/r-1", Some(&admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_user_administration() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let admin = seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;
        let operator = seed_user(&state, "op-1", "Operator@Example.com", Role::Operator).await;

        // The whole group is admin-gated
        let (status, _) = send(&router, "GET", "/api/users", Some(&operator), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&router, "GET", "/api/users", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 2);
        // Credential hashes never leave the server
        assert!(body["users"][0].get("passwordHash").is_none());
        assert!(body["users"][0].get("password_hash").is_none());

        let (status, _) = send(&router, "GET", "/api/users/search", Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            "GET",
            "/api/users/search?email=operator@example",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["users"].as_array().unwrap().len(), 1);
        assert_eq!(body["users"][0]["id"], "op-1");

        let (status, body) = send(
            &router,
            "PATCH",
            "/api/users/op-1/toggle-block",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["isBlocked"], true);

        let (status, body) = send(
            &router,
            "PATCH",
            "/api/users/op-1/role",
            Some(&admin),
            Some(serde_json::json!({ "role": "superuser" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");

        let (status, body) = send(
            &router,
            "PATCH",
            "/api/users/op-1/role",
            Some(&admin),
            Some(serde_json::json!({ "role": "quest" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "quest");

        let (status, _) = send(&router, "DELETE", "/api/users/op-1", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.user_repo.find_by_id("op-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_my_bookings_scoped_to_caller() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        let client = seed_user(&state, "client-1", "client@x.io", Role::Client).await;
        seed_user(&state, "client-2", "other@x.io", Role::Client).await;
        seed_user(&state, "op-1", "op@x.io", Role::Operator).await;
        seed_quest(&state, "q-1", "Escape Room").await;

        for (id, client_id) in [("b-1", "client-1"), ("b-2", "client-2")] {
            state
                .booking_repo
                .create(&Booking {
                    id: id.to_string(),
                    quest_id: "q-1".to_string(),
                    operator_id: "op-1".to_string(),
                    client_id: client_id.to_string(),
                    date: "2024-06-01".to_string(),
                    time: "18:00".to_string(),
                    status: BookingStatus::Pending,
                    bonus_given: false,
                    photos: Vec::new(),
                    created_at: chrono::Utc::now().to_rfc3339(),
                })
                .await
                .unwrap();
        }

        let (status, body) = send(
            &router,
            "GET",
            "/api/bookings/my-bookings",
            Some(&client),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let bookings = body["bookings"].as_array().unwrap();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0]["id"], "b-1");
        assert_eq!(bookings[0]["quest"]["title"], "Escape Room");
        assert_eq!(bookings[0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_quest_listing_is_public_and_active_only() {
        let temp_dir = TempDir::new().unwrap();
        let state = test_state(&temp_dir);
        let router = build_api_routes(state.clone());

        seed_user(&state, "admin-1", "admin@x.io", Role::Admin).await;
        seed_quest(&state, "q-1", "Escape Room").await;
        state
            .quest_repo
            .create(&Quest {
                id: "q-2".to_string(),
                title: "Retired".to_string(),
                description: "old".to_string(),
                owner_id: "admin-1".to_string(),
                photos: Vec::new(),
                min_players: 2,
                max_players: 4,
                is_active: false,
                created_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .unwrap();

        let (status, body) = send(&router, "GET", "/api/quests", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let quests = body["quests"].as_array().unwrap();
        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0]["title"], "Escape Room");
        assert_eq!(quests[0]["owner"]["email"], "admin@x.io");
    }
}
