use super::ApiError;
use rocket::{
    http::Status,
    request::Request,
    response::{self, Responder, Response},
    serde::{json::Json, Serialize},
};

pub enum ApiResult<T> {
    Ok(Json<T>),
    Created(Json<T>),
    NoContent,
    Err(ApiError),
}

impl<T> ApiResult<T> {
    pub fn ok(val: T) -> ApiResult<T> {
        ApiResult::Ok(Json(val))
    }

    pub fn created(val: T) -> ApiResult<T> {
        ApiResult::Created(Json(val))
    }

    pub fn new(result: anyhow::Result<Option<T>>, not_found: &str) -> ApiResult<T> {
        match result {
            Ok(Some(val)) => ApiResult::ok(val),
            Ok(None) => ApiError::new(Status::NotFound, not_found).into(),
            Err(e) => e.into(),
        }
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for ApiResult<T> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        match self {
            ApiResult::Ok(json) => json.respond_to(req),
            ApiResult::Created(json) => Response::build_from(json.respond_to(req)?)
                .status(Status::Created)
                .ok(),
            ApiResult::NoContent => Response::build().status(Status::NoContent).ok(),
            ApiResult::Err(e) => e.respond_to(req),
        }
    }
}

impl<T> From<ApiError> for ApiResult<T> {
    fn from(e: ApiError) -> Self {
        ApiResult::Err(e)
    }
}

impl<T> From<anyhow::Error> for ApiResult<T> {
    fn from(e: anyhow::Error) -> Self {
        ApiResult::Err(e.into())
    }
}
