//! SQLite queries for users and sessions

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::models::{Session, User};
use crate::storage::{timestamp, timestamp_column, uuid_column, Database, Result};

const USER_COLUMNS: &str = "id, name, email, password, image, created_at";

fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        image: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
    })
}

impl Database {
    pub fn insert_user(&self, user: &User) -> Result<()> {
        self.conn().execute(
            "INSERT INTO users (id, name, email, password, image, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                user.image,
                timestamp(&user.created_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS);
        let user = self
            .conn()
            .query_row(&sql, params![email], user_from_row)
            .optional()?;
        Ok(user)
    }

    pub fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = self
            .conn()
            .query_row(&sql, params![id.to_string()], user_from_row)
            .optional()?;
        Ok(user)
    }

    pub fn insert_session(&self, session: &Session) -> Result<()> {
        self.conn().execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id.to_string(),
                timestamp(&session.created_at),
                timestamp(&session.expires_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_session(&self, token: &str) -> Result<Option<Session>> {
        let session = self
            .conn()
            .query_row(
                "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
                params![token],
                |row| {
                    Ok(Session {
                        token: row.get(0)?,
                        user_id: uuid_column(row, 1)?,
                        created_at: timestamp_column(row, 2)?,
                        expires_at: timestamp_column(row, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// Returns whether a session was removed.
    pub fn delete_session(&self, token: &str) -> Result<bool> {
        let removed = self
            .conn()
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(removed > 0)
    }

    pub fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self
            .conn()
            .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![timestamp(&now)])?;
        Ok(removed)
    }
}
