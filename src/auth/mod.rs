//! Accounts, password login and bearer-token sessions
//!
//! This module provides:
//! - Registration with field validation and Argon2id hashing
//! - Email/password login that issues an expiring session token
//! - Token lookup for authenticated requests
//! - Logout

pub mod models;
pub mod password;
mod storage;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::storage::{is_constraint_violation, Database, StorageError};

pub use models::{LoginRequest, PublicUser, RegisterRequest, Session, User};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Session is missing, invalid or expired")]
    InvalidSession,

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Create an account. Returns the public view of the new user.
pub fn register(db: &Database, request: RegisterRequest) -> Result<PublicUser> {
    request.validate()?;

    if db.find_user_by_email(&request.email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let user = new_user(request)?;
    save_user(db, &user)
}

/// Validate a registration and hash its password without touching storage.
pub fn new_user(request: RegisterRequest) -> Result<User> {
    request.validate()?;

    let hash = password::hash_password(&request.password)?;
    Ok(User::new(
        request.name,
        request.email,
        hash,
        request.image.unwrap_or_default(),
    ))
}

/// Store a user built by [`new_user`].
pub fn save_user(db: &Database, user: &User) -> Result<PublicUser> {
    match db.insert_user(user) {
        Ok(()) => {}
        Err(StorageError::Sqlite(e)) if is_constraint_violation(&e) => {
            return Err(AuthError::EmailTaken)
        }
        Err(e) => return Err(e.into()),
    }

    log::info!("Registered user {}", user.id);
    Ok(user.to_public())
}

/// Check credentials and open a session valid for `ttl_hours`.
pub fn login(db: &Database, request: &LoginRequest, ttl_hours: i64) -> Result<(Session, PublicUser)> {
    let user = db
        .find_user_by_email(&request.email)?
        .ok_or(AuthError::InvalidCredentials)?;
    let user = check_password(user, &request.password)?;
    open_session(db, &user, ttl_hours)
}

/// Hand `user` back if `password` matches its stored hash.
pub fn check_password(user: User, password: &str) -> Result<User> {
    if password::verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Issue a session for an already verified user.
pub fn open_session(db: &Database, user: &User, ttl_hours: i64) -> Result<(Session, PublicUser)> {
    let now = Utc::now();
    db.delete_expired_sessions(now)?;

    let session = Session {
        token: password::generate_token(),
        user_id: user.id,
        created_at: now,
        expires_at: now + Duration::hours(ttl_hours),
    };
    db.insert_session(&session)?;

    log::info!("User {} logged in", user.id);
    Ok((session, user.to_public()))
}

/// Resolve a bearer token to its user. Expired sessions are removed.
pub fn authenticate(db: &Database, token: &str) -> Result<PublicUser> {
    let session = db.find_session(token)?.ok_or(AuthError::InvalidSession)?;

    if session.is_expired() {
        db.delete_session(token)?;
        return Err(AuthError::InvalidSession);
    }

    let user = db
        .find_user_by_id(session.user_id)?
        .ok_or(AuthError::InvalidSession)?;
    Ok(user.to_public())
}

pub fn logout(db: &Database, token: &str) -> Result<()> {
    if db.delete_session(token)? {
        log::info!("Session closed");
    }
    Ok(())
}
