use crate::model::{AuthToken, Id};
use anyhow::Result;
use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

#[derive(Clone)]
pub struct AuthTokenRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl AuthTokenRepository {
    pub fn new(pool: &Pool<SqliteConnectionManager>) -> AuthTokenRepository {
        AuthTokenRepository { pool: pool.clone() }
    }

    pub fn insert(&self, row: &AuthToken) -> Result<()> {
        let query =
            "INSERT INTO auth_token (id, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)";
        let params = params![&row.id, &row.user_id, &row.created_at, &row.expires_at];
        self.pool.get()?.execute(query, params)?;
        Ok(())
    }

    pub fn select_by_id(&self, id: &Id) -> Result<Option<AuthToken>> {
        Ok(self
            .pool
            .get()?
            .query_row(
                "SELECT id, user_id, created_at, expires_at FROM auth_token WHERE id = ?",
                params![id],
                |row| {
                    Ok(AuthToken {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        created_at: row.get(2)?,
                        expires_at: row.get(3)?,
                    })
                },
            )
            .optional()?)
    }

    /// Removes tokens that expired before `now`, returns how many were removed.
    pub fn delete_expired(&self, now: &DateTime<Utc>) -> Result<usize> {
        let query = "DELETE FROM auth_token WHERE expires_at < ?";
        Ok(self.pool.get()?.execute(query, params![now])?)
    }
}
