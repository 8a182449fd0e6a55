use crate::{
    model::{Id, User},
    repository::UserRepository,
};
use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use tracing::info;

/// Creates a new user, returns `None` if the username is already taken.
pub fn register(username: &str, password: &str, repo: &UserRepository) -> Result<Option<User>> {
    if repo.select_by_username(username)?.is_some() {
        info!(%username, "Username already registered");
        return Ok(None);
    }

    let user = User {
        id: Id::new(),
        username: username.to_string(),
        password_hash: hash_password(password)?,
        created_at: Utc::now(),
    };

    repo.insert(&user)?;
    info!(%username, id = %user.id, "Registered new user");
    Ok(Some(user))
}

pub fn authenticate(username: &str, password: &str, repo: &UserRepository) -> Result<Option<User>> {
    let user = match repo.select_by_username(username)? {
        Some(user) => user,
        None => return Ok(None),
    };

    if argon2::verify_encoded(&user.password_hash, password.as_bytes())? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt: [u8; 16] = rand::thread_rng().gen();
    Ok(argon2::hash_encoded(
        password.as_bytes(),
        &salt,
        &argon2::Config::default(),
    )?)
}
