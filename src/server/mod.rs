//! HTTP API server.
//!
//! JSON over HTTP on top of the shared SQLite [`Database`]. Signed-in routes
//! expect `Authorization: Bearer <token>` from `/api/auth/login`.

pub mod error;
pub mod extract;
pub mod handlers;

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::storage::Database;

pub use error::ApiError;
pub use extract::AuthUser;

/// Server state shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("Database lock poisoned".to_string()))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::current_session))
        .route("/api/words", get(handlers::list_words))
        .route("/api/words/{id}", get(handlers::get_word))
        .route("/api/lessons", get(handlers::list_lessons))
        .route("/api/lessons/{lesson}/words", get(handlers::lesson_words))
        .route("/api/lessons/{lesson}/stats", get(handlers::lesson_stats))
        .route("/api/lessons/{lesson}/summary", get(handlers::lesson_summary))
        .route("/api/lessons/{lesson}/swipe", post(handlers::swipe))
        .route("/api/progress/words", post(handlers::save_word_progress))
        .route(
            "/api/progress",
            get(handlers::get_progress).put(handlers::update_progress),
        )
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/migrate-words", post(handlers::migrate_words))
        .layer(cors)
        .with_state(state)
}

/// Open the database and serve the API until Ctrl+C.
pub async fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let db = Database::open(&config.database_path)?;
    let address = config.bind_address.clone();
    let app = router(AppState::new(db, config));

    let listener = TcpListener::bind(&address).await?;
    log::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl+C, shutting down"),
        Err(e) => log::error!("Failed to listen for Ctrl+C: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::words::NewWord;

    fn test_state(word_count: i64) -> AppState {
        let mut db = Database::open_in_memory().unwrap();
        let words: Vec<NewWord> = (1..=word_count)
            .map(|i| NewWord {
                no: i,
                tagalog: format!("salita{}", i),
                english: format!("word{}", i),
                ..NewWord::default()
            })
            .collect();
        db.insert_words(&words).unwrap();

        let config = ServerConfig {
            words_per_lesson: 10,
            ..ServerConfig::default()
        };
        AppState::new(db, config)
    }

    async fn send(
        state: &AppState,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register and log in, returning the bearer token.
    async fn sign_in(state: &AppState, email: &str) -> String {
        let (status, _) = send(
            state,
            "POST",
            "/api/register",
            None,
            Some(json!({ "name": "Maria", "email": email, "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            state,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_register_and_duplicate() {
        let state = test_state(0);
        let payload = json!({ "name": "Maria", "email": "maria@example.com", "password": "secret123" });

        let (status, body) = send(&state, "POST", "/api/register", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["user"]["email"], "maria@example.com");
        assert!(body["user"].get("password").is_none());

        let (status, body) = send(&state, "POST", "/api/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User with this email already exists");

        let (status, body) = send(
            &state,
            "POST",
            "/api/register",
            None,
            Some(json!({ "name": "Juan", "email": "not-an-email", "password": "secret123" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid email address");
    }

    #[tokio::test]
    async fn test_session_routes() {
        let state = test_state(0);
        let token = sign_in(&state, "maria@example.com").await;

        let (status, body) = send(&state, "GET", "/api/auth/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Maria");

        let (status, _) = send(&state, "GET", "/api/auth/session", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&state, "POST", "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&state, "GET", "/api/progress", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_login() {
        let state = test_state(0);
        sign_in(&state, "maria@example.com").await;

        let (status, body) = send(
            &state,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "maria@example.com", "password": "wrong-password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_words_listing() {
        let state = test_state(25);

        let (status, body) = send(&state, "GET", "/api/words?page=2&limit=10", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["words"].as_array().unwrap().len(), 10);
        assert_eq!(body["words"][0]["id"], 11);
        assert_eq!(body["words"][0]["audio"]["word"], "/audio/row_0011_word.mp3");
        assert_eq!(body["pagination"]["totalPages"], 3);

        let (_, body) = send(&state, "GET", "/api/words?search=salita25", None, None).await;
        assert_eq!(body["pagination"]["total"], 1);

        let (status, _) = send(&state, "GET", "/api/words?limit=500", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&state, "GET", "/api/words/3", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tagalog"], "salita3");

        let (status, body) = send(&state, "GET", "/api/words/99", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_lessons() {
        let state = test_state(25);

        let (_, body) = send(&state, "GET", "/api/lessons", None, None).await;
        assert_eq!(body["totalWords"], 25);
        assert_eq!(body["lessons"].as_array().unwrap().len(), 3);

        let (_, body) = send(&state, "GET", "/api/lessons?wordsPerLesson=5", None, None).await;
        assert_eq!(body["lessons"].as_array().unwrap().len(), 5);

        let (_, body) = send(&state, "GET", "/api/lessons/3/words", None, None).await;
        let words = body.as_array().unwrap();
        assert_eq!(words.len(), 5);
        assert_eq!(words[0]["id"], 21);

        let (status, _) = send(&state, "GET", "/api/lessons/0/words", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_study_flow_updates_dashboard() {
        let state = test_state(25);
        let token = sign_in(&state, "maria@example.com").await;

        let (_, body) = send(
            &state,
            "POST",
            "/api/lessons/1/swipe",
            Some(&token),
            Some(json!({ "wordId": 1, "offsetX": 150.0 })),
        )
        .await;
        assert_eq!(body, json!({ "recorded": true, "direction": "right", "known": true }));

        let (_, body) = send(
            &state,
            "POST",
            "/api/lessons/1/swipe",
            Some(&token),
            Some(json!({ "wordId": 2, "offsetX": -40.0 })),
        )
        .await;
        assert_eq!(body, json!({ "recorded": false }));

        let (status, body) = send(
            &state,
            "POST",
            "/api/progress/words",
            Some(&token),
            Some(json!({ "wordId": 2, "known": false, "lessonNumber": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, _) = send(
            &state,
            "POST",
            "/api/progress/words",
            Some(&token),
            Some(json!({ "wordId": 999, "known": true, "lessonNumber": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&state, "GET", "/api/lessons/1/stats", Some(&token), None).await;
        assert_eq!(body, json!({ "total": 2, "known": 1, "unknown": 1 }));

        let (_, body) = send(&state, "GET", "/api/lessons/1/summary", Some(&token), None).await;
        assert_eq!(body["accuracy"], 50);
        assert_eq!(body["nextLesson"], 2);

        let (_, body) = send(&state, "GET", "/api/dashboard", Some(&token), None).await;
        assert_eq!(body["wordStats"]["totalAnswered"], 2);
        assert_eq!(body["accuracy"], 50);
        assert_eq!(body["lessonStats"][0]["lessonNumber"], 1);
        assert_eq!(body["recentActivity"][0]["wordsLearned"], 2);
    }

    #[tokio::test]
    async fn test_progress_round_trip() {
        let state = test_state(0);
        let token = sign_in(&state, "maria@example.com").await;

        let (_, body) = send(&state, "GET", "/api/progress", Some(&token), None).await;
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["wordsCompleted"], 0);

        let update = json!({ "currentPage": 4, "totalPages": 10, "wordsCompleted": 60, "totalWords": 200 });
        let (status, _) = send(&state, "PUT", "/api/progress", Some(&token), Some(update)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&state, "GET", "/api/progress", Some(&token), None).await;
        assert_eq!(body["currentPage"], 4);
        assert_eq!(body["totalWords"], 200);

        let bad = json!({ "currentPage": 0, "totalPages": 10, "wordsCompleted": 0, "totalWords": 0 });
        let (status, body) = send(&state, "PUT", "/api/progress", Some(&token), Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "currentPage must be at least 1");
    }

    #[tokio::test]
    async fn test_migrate_words() {
        let temp = TempDir::new().unwrap();
        let csv_path = temp.path().join("words.csv");
        std::fs::write(
            &csv_path,
            "no,tagalog,english,example,translation\n1,bahay,house,,\n2,aso,dog,,\n",
        )
        .unwrap();

        let config = ServerConfig {
            words_csv_path: csv_path,
            ..ServerConfig::default()
        };
        let state = AppState::new(Database::open_in_memory().unwrap(), config);

        let (status, body) = send(&state, "POST", "/api/migrate-words", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["insertedCount"], 2);
        assert_eq!(body["message"], "Successfully inserted 2 words");

        let missing = ServerConfig {
            words_csv_path: temp.path().join("missing.csv"),
            ..ServerConfig::default()
        };
        let state = AppState::new(Database::open_in_memory().unwrap(), missing);
        let (status, body) = send(&state, "POST", "/api/migrate-words", None, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_malformed_requests_get_json_errors() {
        let state = test_state(5);

        let (status, body) = send(
            &state,
            "POST",
            "/api/register",
            None,
            Some(json!({ "name": "Maria", "email": "maria@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("password"));

        let (status, body) = send(&state, "GET", "/api/words?page=abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&state, "GET", "/api/words/abc", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let token = sign_in(&state, "maria@example.com").await;
        let (status, body) = send(
            &state,
            "POST",
            "/api/progress/words",
            Some(&token),
            Some(json!({ "wordId": "one", "known": true })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_extreme_numbers_are_handled() {
        let state = test_state(25);

        let uri = format!("/api/words?page={}", i64::MAX);
        let (status, body) = send(&state, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "page is out of range");

        let uri = format!("/api/lessons/{}/words", i64::MAX);
        let (status, body) = send(&state, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let uri = format!("/api/lessons?wordsPerLesson={}", i64::MAX);
        let (status, body) = send(&state, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lessons"].as_array().unwrap().len(), 1);
        assert_eq!(body["lessons"][0]["wordCount"], 25);

        let token = sign_in(&state, "maria@example.com").await;
        let uri = format!("/api/lessons/1/summary?wordsPerLesson={}", i64::MAX);
        let (status, body) = send(&state, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("nextLesson").is_none());
    }

    #[tokio::test]
    async fn test_register_stores_image() {
        let state = test_state(0);
        let (status, _) = send(
            &state,
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Maria",
                "email": "maria@example.com",
                "password": "secret123",
                "image": "https://example.com/maria.png"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let stored = state
            .db()
            .unwrap()
            .find_user_by_email("maria@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(stored.image, "https://example.com/maria.png");
    }

    #[tokio::test]
    async fn test_health() {
        let state = test_state(0);
        let (status, body) = send(&state, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
