use crate::model::{Id, User};
use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl UserRepository {
    pub fn new(pool: &Pool<SqliteConnectionManager>) -> UserRepository {
        UserRepository { pool: pool.clone() }
    }

    pub fn insert(&self, row: &User) -> Result<()> {
        let query = "INSERT INTO user (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)";
        let params = params![&row.id, &row.username, &row.password_hash, &row.created_at];
        self.pool.get()?.execute(query, params)?;
        Ok(())
    }

    pub fn select_by_id(&self, id: &Id) -> Result<Option<User>> {
        Ok(self
            .pool
            .get()?
            .query_row(
                "SELECT id, username, password_hash, created_at FROM user WHERE id = ?",
                params![id],
                mapper,
            )
            .optional()?)
    }

    pub fn select_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .pool
            .get()?
            .query_row(
                "SELECT id, username, password_hash, created_at FROM user WHERE username = ?",
                params![username],
                mapper,
            )
            .optional()?)
    }
}

fn mapper(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}
