use crate::{
    model::{ApiError, ApiResult},
    repository::{AuthTokenRepository, UserRepository},
    service::{auth_token, blocking, user},
};
use chrono::Duration;
use rocket::{form::Form, http::Status, post, FromForm, State};
use serde::{Deserialize, Serialize};
use tracing::info;

pub struct TokenTtl(pub Duration);

#[derive(FromForm)]
pub struct LoginInput {
    username: String,
    password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: String,
}

#[post("/login", data = "<input>")]
pub async fn login(
    input: Form<LoginInput>,
    ttl: &State<TokenTtl>,
    auth_token_repo: &State<AuthTokenRepository>,
    user_repo: &State<UserRepository>,
) -> ApiResult<LoginOutput> {
    let LoginInput { username, password } = input.into_inner();
    let username = username.trim().to_string();
    let ttl = ttl.0;
    let auth_token_repo = auth_token_repo.inner().clone();
    let user_repo = user_repo.inner().clone();

    let token = blocking(move || match user::authenticate(&username, &password, &user_repo)? {
        Some(user) => auth_token::issue(&user, ttl, &auth_token_repo).map(Some),
        None => {
            info!(%username, "Login rejected");
            Ok(None)
        }
    })
    .await;

    match token {
        Ok(Some(token)) => ApiResult::ok(LoginOutput {
            access_token: token.id.to_string(),
            token_type: "bearer".into(),
        }),
        Ok(None) => ApiError::new(Status::Unauthorized, "Invalid credentials").into(),
        Err(e) => e.into(),
    }
}

#[cfg(test)]
mod test {
    use super::LoginOutput;
    use crate::test::{client, register};
    use rocket::http::{ContentType, Header, Status};

    #[test]
    fn login() {
        let client = client();
        register(&client, "alice", "secret");
        let res = client
            .post("/login")
            .header(ContentType::Form)
            .body("username=alice&password=secret")
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
        let body = res.into_json::<LoginOutput>().unwrap();
        assert_eq!("bearer", body.token_type);

        let res = client
            .get("/me")
            .header(Header::new("Authorization", format!("Bearer {}", body.access_token)))
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
    }

    #[test]
    fn login_wrong_password() {
        let client = client();
        register(&client, "alice", "secret");
        let res = client
            .post("/login")
            .header(ContentType::Form)
            .body("username=alice&password=nope")
            .dispatch();
        assert_eq!(res.status(), Status::Unauthorized);
        let body = res.into_string().unwrap();
        assert!(body.contains("Invalid credentials"));
    }

    #[test]
    fn login_trims_username() {
        let client = client();
        register(&client, " alice", "secret");
        let res = client
            .post("/login")
            .header(ContentType::Form)
            .body("username=%20alice%20&password=secret")
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
    }

    #[test]
    fn login_unknown_user() {
        let client = client();
        let res = client
            .post("/login")
            .header(ContentType::Form)
            .body("username=ghost&password=secret")
            .dispatch();
        assert_eq!(res.status(), Status::Unauthorized);
    }
}
