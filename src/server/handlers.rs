//! HTTP handlers. Each one locks the database, runs one domain operation
//! and returns JSON.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery, AuthUser},
    AppState,
};
use crate::auth::{self, AuthError, LoginRequest, PublicUser, RegisterRequest};
use crate::import;
use crate::progress::{DashboardStats, ProgressUpdate, UserProgress};
use crate::study::{LessonSummary, SwipeOutcome, SwipeRequest};
use crate::words::{LessonList, LessonStats, Word, WordPage, WordProgressInput, WordQuery};

type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonParams {
    pub words_per_lesson: Option<i64>,
}

impl LessonParams {
    fn words_per_lesson(&self, state: &AppState) -> i64 {
        self.words_per_lesson
            .unwrap_or(state.config.words_per_lesson)
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run CPU-heavy auth work (password hashing) on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Blocking task failed: {}", e)))?
        .map_err(Into::into)
}

fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// ==================== Accounts ====================

pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    let pending = blocking(move || auth::new_user(request)).await?;
    let user = auth::save_user(&*state.db()?, &pending)?;
    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let stored = state
        .db()?
        .find_user_by_email(&request.email)?
        .ok_or(AuthError::InvalidCredentials)?;
    let verified = blocking(move || auth::check_password(stored, &request.password)).await?;

    let db = state.db()?;
    let (session, user) = auth::open_session(&db, &verified, state.config.session_ttl_hours)?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
    }))
}

pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> ApiResult<Value> {
    let db = state.db()?;
    auth::logout(&db, &auth_user.token)?;
    Ok(success())
}

pub async fn current_session(auth_user: AuthUser) -> Json<PublicUser> {
    Json(auth_user.user)
}

// ==================== Words & lessons ====================

pub async fn list_words(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<WordQuery>,
) -> ApiResult<WordPage> {
    let db = state.db()?;
    let mut page = db.get_words(&query)?;
    for word in &mut page.words {
        word.attach_audio(&state.config.audio_base_url);
    }
    Ok(Json(page))
}

pub async fn get_word(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Option<Word>> {
    let db = state.db()?;
    let word = db.get_word_by_id(id)?.map(|mut word| {
        word.attach_audio(&state.config.audio_base_url);
        word
    });
    Ok(Json(word))
}

pub async fn list_lessons(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<LessonParams>,
) -> ApiResult<LessonList> {
    let db = state.db()?;
    Ok(Json(db.get_lessons(params.words_per_lesson(&state))?))
}

pub async fn lesson_words(
    State(state): State<AppState>,
    ApiPath(lesson_number): ApiPath<i64>,
    ApiQuery(params): ApiQuery<LessonParams>,
) -> ApiResult<Vec<Word>> {
    let db = state.db()?;
    let mut words = db.get_words_by_lesson(lesson_number, params.words_per_lesson(&state))?;
    for word in &mut words {
        word.attach_audio(&state.config.audio_base_url);
    }
    Ok(Json(words))
}

pub async fn lesson_stats(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(lesson_number): ApiPath<i64>,
) -> ApiResult<LessonStats> {
    let db = state.db()?;
    Ok(Json(db.get_lesson_stats(auth_user.id(), lesson_number)?))
}

pub async fn lesson_summary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(lesson_number): ApiPath<i64>,
    ApiQuery(params): ApiQuery<LessonParams>,
) -> ApiResult<LessonSummary> {
    let db = state.db()?;
    let summary = db.lesson_summary(
        auth_user.id(),
        lesson_number,
        params.words_per_lesson(&state),
    )?;
    Ok(Json(summary))
}

pub async fn swipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(lesson_number): ApiPath<i64>,
    ApiJson(request): ApiJson<SwipeRequest>,
) -> ApiResult<SwipeOutcome> {
    let db = state.db()?;
    Ok(Json(db.record_swipe(auth_user.id(), lesson_number, &request)?))
}

// ==================== Progress ====================

pub async fn save_word_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(input): ApiJson<WordProgressInput>,
) -> ApiResult<Value> {
    let db = state.db()?;
    db.save_word_progress(auth_user.id(), &input)?;
    Ok(success())
}

pub async fn get_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<UserProgress> {
    let db = state.db()?;
    Ok(Json(db.get_progress_or_initial(auth_user.id())?))
}

pub async fn update_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(update): ApiJson<ProgressUpdate>,
) -> ApiResult<UserProgress> {
    let db = state.db()?;
    Ok(Json(db.update_progress(auth_user.id(), &update)?))
}

pub async fn dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<DashboardStats> {
    let db = state.db()?;
    Ok(Json(db.dashboard_stats(auth_user.id())?))
}

// ==================== Word import ====================

pub async fn migrate_words(State(state): State<AppState>) -> Response {
    let result = state
        .db()
        .and_then(|mut db| import::import_words(&mut db, &state.config.words_csv_path).map_err(Into::into));

    match result {
        Ok(report) => Json(MigrationResponse {
            success: true,
            inserted_count: Some(report.inserted_count),
            message: Some(format!(
                "Successfully inserted {} words",
                report.inserted_count
            )),
            error: None,
        })
        .into_response(),
        Err(err) => {
            log::error!("Word import failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MigrationResponse {
                    success: false,
                    inserted_count: None,
                    message: None,
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        }
    }
}
