use crate::model::ApiError;
use rocket::{catch, http::Status, routes, Request, Route};

pub mod auth_token;
pub mod expense;
pub mod health;
pub mod user;

pub fn routes() -> Vec<Route> {
    routes![
        health::healthz,
        user::register,
        user::me,
        auth_token::login,
        expense::post,
        expense::list,
        expense::get,
        expense::put,
        expense::delete,
    ]
}

#[catch(default)]
pub fn error(status: Status, _req: &Request) -> ApiError {
    if status == Status::Unauthorized {
        ApiError::new(status, "Could not validate credentials")
    } else {
        status.into()
    }
}
