use anyhow::Result;

pub mod auth_token;
pub mod expense;
pub mod user;

/// Runs pooled SQLite and argon2 work on the blocking thread pool, off the
/// async executor.
pub async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
