use crate::model::{Expense, Id};
use anyhow::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};

const COLUMNS: &str = "id, owner_id, title, amount, date, description, category";

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl ExpenseRepository {
    pub fn new(pool: &Pool<SqliteConnectionManager>) -> ExpenseRepository {
        ExpenseRepository { pool: pool.clone() }
    }

    pub fn insert(&self, row: &Expense) -> Result<()> {
        let query = format!("INSERT INTO expense ({}) VALUES (?, ?, ?, ?, ?, ?, ?)", COLUMNS);
        let params = params![
            &row.id,
            &row.owner_id,
            &row.title,
            row.amount,
            &row.date,
            &row.description,
            &row.category,
        ];
        self.pool.get()?.execute(&query, params)?;
        Ok(())
    }

    pub fn select_by_id(&self, id: &Id, owner_id: &Id) -> Result<Option<Expense>> {
        let query = format!("SELECT {} FROM expense WHERE id = ? AND owner_id = ?", COLUMNS);
        Ok(self
            .pool
            .get()?
            .query_row(&query, params![id, owner_id], mapper)
            .optional()?)
    }

    pub fn select_by_owner(&self, owner_id: &Id, skip: u32, limit: u32) -> Result<Vec<Expense>> {
        let query = format!(
            "SELECT {} FROM expense WHERE owner_id = ? ORDER BY date, id LIMIT ? OFFSET ?",
            COLUMNS
        );
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params![owner_id, limit, skip], mapper)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn update(&self, row: &Expense) -> Result<bool> {
        let query = r#"
            UPDATE expense
            SET title = ?, amount = ?, date = ?, description = ?, category = ?
            WHERE id = ? AND owner_id = ?
        "#;
        let params = params![
            &row.title,
            row.amount,
            &row.date,
            &row.description,
            &row.category,
            &row.id,
            &row.owner_id,
        ];
        Ok(self.pool.get()?.execute(query, params)? == 1)
    }

    pub fn delete(&self, id: &Id, owner_id: &Id) -> Result<bool> {
        let query = "DELETE FROM expense WHERE id = ? AND owner_id = ?";
        Ok(self.pool.get()?.execute(query, params![id, owner_id])? == 1)
    }
}

fn mapper(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
        category: row.get(6)?,
    })
}
