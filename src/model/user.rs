use crate::model::Id;
use crate::repository::{AuthTokenRepository, UserRepository};
use crate::service::{auth_token, blocking};
use chrono::{DateTime, Utc};
use rocket::{
    http::Status,
    outcome::try_outcome,
    request::{FromRequest, Outcome, Request},
    State,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    #[serde(rename = "_id", alias = "id")]
    pub id: Id,
    pub username: String,
}

impl From<User> for UserView {
    fn from(user: User) -> UserView {
        UserView {
            id: user.id,
            username: user.username,
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for User {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token_repo = try_outcome!(req.guard::<&State<AuthTokenRepository>>().await);
        let user_repo = try_outcome!(req.guard::<&State<UserRepository>>().await);

        let auth_headers: Vec<_> = req.headers().get("Authorization").collect();

        if auth_headers.len() != 1 {
            return Outcome::Error((Status::Unauthorized, ()));
        }

        let token_id = match bearer_token(auth_headers[0]) {
            Some(id) => id,
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let token_repo = token_repo.inner().clone();
        let user_repo = user_repo.inner().clone();
        let user = blocking(move || auth_token::authenticate(&token_id, &token_repo, &user_repo)).await;

        match user {
            Ok(Some(user)) => Outcome::Success(user),
            Ok(None) => {
                info!(uri = %req.uri(), "Rejected request with invalid or expired token");
                Outcome::Error((Status::Unauthorized, ()))
            }
            Err(e) => {
                error!(%e, "Failed to authenticate request");
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

fn bearer_token(header: &str) -> Option<Id> {
    let parts: Vec<_> = header.split(' ').filter(|it| !it.is_empty()).collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => token.parse::<Id>().ok(),
        _ => None,
    }
}
