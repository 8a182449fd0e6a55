use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rocket::{get, serde::json::Json, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[get("/healthz")]
pub async fn healthz(pool: &State<Pool<SqliteConnectionManager>>) -> Json<Health> {
    let health = match tables(pool) {
        Ok(tables) => Health {
            ok: true,
            tables,
            error: None,
        },
        Err(e) => Health {
            ok: false,
            tables: vec![],
            error: Some(e.to_string()),
        },
    };

    Json(health)
}

fn tables(pool: &Pool<SqliteConnectionManager>) -> anyhow::Result<Vec<String>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = stmt.query_map([], |row| row.get(0))?;
    Ok(names.collect::<rusqlite::Result<Vec<String>>>()?)
}
