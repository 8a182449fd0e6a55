use anyhow::{anyhow, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::{
    env,
    {include_bytes, path::PathBuf},
};

#[derive(Deserialize)]
pub struct Conf {
    pub data_dir: PathBuf,
    pub db_url: String,
    pub api_url: String,
    pub token_ttl_minutes: i64,
    pub migrations: Vec<Migration>,
}

#[derive(Clone, Deserialize)]
pub struct Migration {
    pub version: i16,
    pub up: String,
    pub down: String,
}

impl Conf {
    pub fn new() -> Result<Conf> {
        let data_dir = data_dir()?;
        Conf::from_figment(Conf::figment(&data_dir))
    }

    pub fn figment(data_dir: &PathBuf) -> Figment {
        let default_conf = include_bytes!("../expenses.conf");
        let default_conf = String::from_utf8_lossy(default_conf);

        Figment::new()
            .merge(Toml::string(&default_conf))
            .merge(("data_dir", data_dir))
            .merge(("db_url", data_dir.join("expenses.db")))
            .merge(Toml::file(data_dir.join("expenses.conf")))
            .merge(Env::prefixed("EXPENSES_"))
    }

    pub fn from_figment(figment: Figment) -> Result<Conf> {
        Ok(figment.extract()?)
    }

    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.json")
    }
}

pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }

    dirs::data_dir()
        .map(|dir| dir.join("expenses"))
        .ok_or_else(|| anyhow!("Unable to locate data directory, set DATA_DIR"))
}
