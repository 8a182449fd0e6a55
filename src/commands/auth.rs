use super::Context;
use crate::{
    client::{storage::TOKEN_KEY, RemoteError},
    output,
};
use anyhow::{anyhow, Context as _, Result};
use dialoguer::Password;
use tracing::info;

const REGISTRATION_FAILED: &str = "Registration failed. Try a different username.";

pub async fn login(ctx: &mut Context, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    check_credentials(username, &password)?;

    let token = ctx
        .anonymous_client()
        .login(username, &password)
        .await
        .context("Invalid username or password")?;

    ctx.storage.set_item(TOKEN_KEY, &token.access_token)?;
    info!(%username, "Logged in");
    output::success(&format!("Logged in as {}", username));
    Ok(())
}

pub async fn register(ctx: &Context, username: &str, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    check_credentials(username, &password)?;

    match ctx.anonymous_client().register(username, &password).await {
        Ok(user) => {
            info!(username = %user.username, "Registered");
            output::success("Registration successful! Please log in.");
            Ok(())
        }
        Err(e) => {
            let message = registration_error(&e);
            Err(e.context(message))
        }
    }
}

pub fn logout(ctx: &mut Context) -> Result<()> {
    ctx.storage.remove_item(TOKEN_KEY)?;
    output::success("Logged out");
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let user = ctx.client()?.me().await.context("Failed to load user")?;
    output::info(&format!("{} ({})", user.username, user.id));
    Ok(())
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(Password::new().with_prompt("Password").interact()?),
    }
}

fn check_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(anyhow!("Username and password are required"));
    }
    Ok(())
}

fn registration_error(error: &anyhow::Error) -> String {
    error
        .downcast_ref::<RemoteError>()
        .map(|it| it.message.trim())
        .filter(|it| !it.is_empty())
        .unwrap_or(REGISTRATION_FAILED)
        .to_string()
}
