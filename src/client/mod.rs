use crate::{
    controller::{auth_token::LoginOutput, user::RegisterInput},
    model::{Expense, ExpenseCreate, ExpenseUpdate, Id, UserView},
};
use anyhow::Result;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::fmt;
use tracing::debug;

pub mod storage;
pub use storage::LocalStorage;

/// Non-2xx answer from the API.
#[derive(Debug, PartialEq)]
pub struct RemoteError {
    pub status: u16,
    pub message: String,
}

impl RemoteError {
    pub fn from_body(status: u16, body: &str) -> RemoteError {
        #[derive(Deserialize)]
        struct Body {
            message: String,
        }

        let message = match serde_json::from_str::<Body>(body) {
            Ok(body) => body.message,
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => StatusCode::from_u16(status)
                .ok()
                .and_then(|it| it.canonical_reason())
                .unwrap_or("")
                .to_string(),
        };

        RemoteError { status, message }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error {}: {}", self.status, self.message)
    }
}

impl std::error::Error for RemoteError {}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> ApiClient {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(|it| it.to_string()),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<UserView> {
        let input = RegisterInput {
            username: username.into(),
            password: password.into(),
        };
        let req = self.http.post(self.url("/register")).json(&input);
        parse(self.send(req).await?).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutput> {
        let req = self
            .http
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)]);
        parse(self.send(req).await?).await
    }

    pub async fn me(&self) -> Result<UserView> {
        let req = self.authorized(self.http.get(self.url("/me")));
        parse(self.send(req).await?).await
    }

    pub async fn list_expenses(&self, skip: u32, limit: u32) -> Result<Vec<Expense>> {
        let req = self.authorized(
            self.http
                .get(self.url("/expenses"))
                .query(&[("skip", skip), ("limit", limit)]),
        );
        parse(self.send(req).await?).await
    }

    pub async fn get_expense(&self, id: &Id) -> Result<Expense> {
        let req = self.authorized(self.http.get(self.url(&format!("/expenses/{}", id))));
        parse(self.send(req).await?).await
    }

    pub async fn create_expense(&self, input: &ExpenseCreate) -> Result<Expense> {
        let req = self.authorized(self.http.post(self.url("/expenses")).json(input));
        parse(self.send(req).await?).await
    }

    pub async fn update_expense(&self, id: &Id, input: &ExpenseUpdate) -> Result<Expense> {
        let req = self.authorized(
            self.http
                .put(self.url(&format!("/expenses/{}", id)))
                .json(input),
        );
        parse(self.send(req).await?).await
    }

    pub async fn delete_expense(&self, id: &Id) -> Result<()> {
        let req = self.authorized(self.http.delete(self.url(&format!("/expenses/{}", id))));
        self.send(req).await?;
        Ok(())
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let res = req.send().await?;
        let status = res.status();
        debug!(url = %res.url(), %status, "API response");

        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        Err(RemoteError::from_body(status.as_u16(), &body).into())
    }
}

async fn parse<T: DeserializeOwned>(res: Response) -> Result<T> {
    Ok(res.json::<T>().await?)
}

/// True when `error` is an API rejection of the stored token.
pub fn is_unauthorized(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|it| it.downcast_ref::<RemoteError>())
        .any(|it| it.is_unauthorized())
}

#[cfg(test)]
mod test {
    use super::{is_unauthorized, ApiClient, RemoteError};
    use crate::{
        model::{ExpenseCreate, ExpenseUpdate, Id},
        prepare,
        test::{conf, pool},
    };
    use anyhow::{anyhow, Result};
    use chrono::{TimeZone, Utc};
    use rocket::{fairing::AdHoc, Shutdown};
    use std::net::TcpListener;
    use tokio::sync::oneshot;

    /// Launches the API on a free local port, returns its base URL.
    async fn serve() -> Result<(String, Shutdown)> {
        let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
        let figment = rocket::Config::figment()
            .merge(("address", "127.0.0.1"))
            .merge(("port", port))
            .merge(("log_level", "off"));
        let (ready, started) = oneshot::channel();

        let rocket = prepare(rocket::custom(figment), &conf(), pool())
            .attach(AdHoc::on_liftoff("Ready", |_| {
                Box::pin(async move {
                    let _ = ready.send(());
                })
            }))
            .ignite()
            .await?;
        let shutdown = rocket.shutdown();
        tokio::spawn(rocket.launch());
        started.await?;

        Ok((format!("http://127.0.0.1:{}", port), shutdown))
    }

    fn remote(error: &anyhow::Error) -> Option<&RemoteError> {
        error.downcast_ref::<RemoteError>()
    }

    #[rocket::async_test]
    async fn round_trip() -> Result<()> {
        let (base_url, shutdown) = serve().await?;

        let anonymous = ApiClient::new(&base_url, None);
        assert_eq!("alice", anonymous.register("alice", "secret").await?.username);
        let taken = anonymous.register("alice", "secret").await.unwrap_err();
        assert_eq!(Some("Username already registered"), remote(&taken).map(|it| it.message.as_str()));
        let rejected = anonymous.login("alice", "wrong").await.unwrap_err();
        assert_eq!(Some(401), remote(&rejected).map(|it| it.status));
        assert!(is_unauthorized(&anonymous.me().await.unwrap_err()));

        let token = anonymous.login("alice", "secret").await?;
        assert_eq!("bearer", token.token_type);
        let client = ApiClient::new(&base_url, Some(&token.access_token));
        assert_eq!("alice", client.me().await?.username);

        let created = client
            .create_expense(&ExpenseCreate {
                title: "Groceries".into(),
                amount: 500.0,
                date: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
                description: None,
                category: Some("Food".into()),
            })
            .await?;
        assert_eq!(vec![created.clone()], client.list_expenses(0, 100).await?);
        assert_eq!(created, client.get_expense(&created.id).await?);

        let update = ExpenseUpdate {
            amount: Some(650.0),
            ..ExpenseUpdate::default()
        };
        let updated = client.update_expense(&created.id, &update).await?;
        assert_eq!(650.0, updated.amount);
        assert_eq!("Groceries", updated.title);

        client.delete_expense(&created.id).await?;
        let missing = client.get_expense(&created.id).await.unwrap_err();
        let missing = remote(&missing).unwrap();
        assert_eq!((404, "Expense not found"), (missing.status, missing.message.as_str()));

        let stale = ApiClient::new(&base_url, Some(&Id::new().to_string()));
        let expired = stale.list_expenses(0, 100).await.unwrap_err();
        assert!(is_unauthorized(&expired));
        assert_eq!(Some("Could not validate credentials"), remote(&expired).map(|it| it.message.as_str()));

        shutdown.notify();
        Ok(())
    }

    #[test]
    fn error_message_from_json_body() {
        let err = RemoteError::from_body(400, r#"{"code": 400, "message": "Username already registered"}"#);
        assert_eq!("Username already registered", err.message);
        assert_eq!(400, err.status);
    }

    #[test]
    fn error_message_from_plain_body() {
        assert_eq!("boom", RemoteError::from_body(500, "boom\n").message);
    }

    #[test]
    fn error_message_from_empty_body() {
        assert_eq!("Not Found", RemoteError::from_body(404, "").message);
    }

    #[test]
    fn detects_unauthorized_through_context() {
        let err = anyhow::Error::new(RemoteError::from_body(401, ""))
            .context("Failed to load expenses");
        assert!(is_unauthorized(&err));

        let err = anyhow::Error::new(RemoteError::from_body(500, ""));
        assert!(!is_unauthorized(&err));

        let err = anyhow!("offline").context("Failed to load expenses");
        assert!(!is_unauthorized(&err));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new("http://127.0.0.1:8000/", None);
        assert_eq!("http://127.0.0.1:8000/expenses", client.url("/expenses"));
    }
}
