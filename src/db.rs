use crate::conf::{Conf, Migration};
use anyhow::{anyhow, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::{fs::remove_file, path::Path};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum DbVersion {
    Specific(i16),
    Latest,
}

pub fn drop(conf: &Conf) -> Result<()> {
    warn!(db_url = %conf.db_url, "Dropping database");
    remove_file(&conf.db_url)?;
    Ok(())
}

pub fn migrate_to_latest(conn: &mut Connection, migrations: &[Migration]) -> Result<()> {
    migrate(conn, migrations, DbVersion::Latest)
}

pub fn migrate(conn: &mut Connection, migrations: &[Migration], target: DbVersion) -> Result<()> {
    let latest = migrations.iter().map(|it| it.version).max().unwrap_or(0);
    let current = schema_version(conn)?;

    let target = match target {
        DbVersion::Latest => latest,
        DbVersion::Specific(v) if v < 0 || v > latest => {
            return Err(anyhow!("Unknown schema version {}, latest is {}", v, latest));
        }
        DbVersion::Specific(v) => v,
    };

    if current == target {
        info!(version = current, "Schema is up to date");
        return Ok(());
    }

    let mut steps: Vec<&Migration> = migrations
        .iter()
        .filter(|it| it.version > current.min(target) && it.version <= current.max(target))
        .collect();
    steps.sort_by_key(|it| it.version);

    if current < target {
        info!(from = current, to = target, steps = steps.len(), "Upgrading schema");
        for migration in steps {
            step(conn, &migration.up, migration.version)?;
        }
    } else {
        warn!(from = current, to = target, steps = steps.len(), "Downgrading schema");
        for migration in steps.iter().rev() {
            step(conn, &migration.down, migration.version - 1)?;
        }
    }

    Ok(())
}

fn step(conn: &mut Connection, sql: &str, version: i16) -> Result<()> {
    debug!(version, sql = sql.trim(), "Applying migration");
    let tx = conn.transaction()?;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", &version)?;
    tx.commit()?;
    Ok(())
}

pub fn pool(db_url: &str) -> Result<Pool<SqliteConnectionManager>> {
    if let Some(dir) = Path::new(db_url).parent() {
        if !db_url.starts_with("file:") && !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let manager = SqliteConnectionManager::file(db_url);
    Ok(Pool::new(manager)?)
}

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i16> {
    conn.query_row("SELECT user_version FROM pragma_user_version", [], |row| {
        row.get(0)
    })
}
