use anyhow::Error;
use rocket::{
    http::{ContentType, Status},
    request::Request,
    response::{self, Responder, Response},
};
use serde::Serialize;
use std::io::Cursor;
use tracing::error;

/// Error answer of the API, rendered as `{"code": .., "message": ..}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: Status,
    pub message: String,
    pub source: Option<Error>,
}

#[derive(Serialize)]
struct Body<'a> {
    code: u16,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: Status, message: &str) -> ApiError {
        ApiError {
            status,
            message: message.to_string(),
            source: None,
        }
    }

    /// 500 with the generic reason phrase. `source` is logged, never sent.
    pub fn internal(source: Error) -> ApiError {
        ApiError {
            status: Status::InternalServerError,
            message: reason(Status::InternalServerError),
            source: Some(source),
        }
    }

    fn body(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Body {
            code: self.status.code,
            message: &self.message,
        })
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        if let Some(source) = &self.source {
            error!(error = %source, code = self.status.code, "Request failed");
        }

        let body = self.body().map_err(|_| Status::InternalServerError)?;

        Response::build()
            .header(ContentType::JSON)
            .status(self.status)
            .sized_body(body.len(), Cursor::new(body))
            .ok()
    }
}

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        ApiError::new(status, &reason(status))
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::internal(e)
    }
}

fn reason(status: Status) -> String {
    status.reason().unwrap_or("").to_string()
}
