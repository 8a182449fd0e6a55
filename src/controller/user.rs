use crate::{
    model::{ApiError, ApiResult, User, UserView},
    repository::UserRepository,
    service::{blocking, user},
};
use rocket::{get, http::Status, post, serde::json::Json, State};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
}

#[post("/register", data = "<input>")]
pub async fn register(input: Json<RegisterInput>, repo: &State<UserRepository>) -> ApiResult<UserView> {
    let RegisterInput { username, password } = input.into_inner();
    let username = username.trim().to_string();

    if username.is_empty() || password.is_empty() {
        return ApiError::new(Status::UnprocessableEntity, "Username and password are required").into();
    }

    let repo = repo.inner().clone();
    match blocking(move || user::register(&username, &password, &repo)).await {
        Ok(Some(user)) => ApiResult::created(user.into()),
        Ok(None) => ApiError::new(Status::BadRequest, "Username already registered").into(),
        Err(e) => e.into(),
    }
}

#[get("/me")]
pub async fn me(user: User) -> Json<UserView> {
    Json(user.into())
}

#[cfg(test)]
mod test {
    use super::RegisterInput;
    use crate::{
        model::UserView,
        test::{authorized, client},
    };
    use rocket::http::Status;

    #[test]
    fn register() {
        let client = client();
        let input = RegisterInput {
            username: "alice".into(),
            password: "secret".into(),
        };
        let res = client.post("/register").json(&input).dispatch();
        assert_eq!(res.status(), Status::Created);
        let body = res.into_json::<UserView>().unwrap();
        assert_eq!("alice", body.username);
    }

    #[test]
    fn register_taken() {
        let client = client();
        let input = RegisterInput {
            username: "alice".into(),
            password: "secret".into(),
        };
        client.post("/register").json(&input).dispatch();
        let res = client.post("/register").json(&input).dispatch();
        assert_eq!(res.status(), Status::BadRequest);
        assert!(res.into_string().unwrap().contains("Username already registered"));
    }

    #[test]
    fn register_blank() {
        let client = client();
        let input = RegisterInput {
            username: "  ".into(),
            password: "secret".into(),
        };
        let res = client.post("/register").json(&input).dispatch();
        assert_eq!(res.status(), Status::UnprocessableEntity);
    }

    #[test]
    fn me() {
        let client = client();
        let auth = authorized(&client, "alice");
        let res = client.get("/me").header(auth).dispatch();
        assert_eq!(res.status(), Status::Ok);
        assert_eq!("alice", res.into_json::<UserView>().unwrap().username);
    }

    #[test]
    fn me_unauthorized() {
        let client = client();
        let res = client.get("/me").dispatch();
        assert_eq!(res.status(), Status::Unauthorized);
        assert!(res.into_string().unwrap().contains("Could not validate credentials"));
    }
}
