//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde::Serialize;

use crate::domain::error::TradesimError;

pub(super) const INVALID_PAYLOAD: &str = "Invalid request payload";
pub(super) const NOT_FOUND: &str = "Not found";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a lookup failure: zero rows becomes a 404 carrying `missing`.
    pub fn lookup(err: TradesimError, missing: &str) -> Self {
        match err {
            TradesimError::NotFound { .. } => Self::not_found(missing),
            other => other.into(),
        }
    }
}

impl From<TradesimError> for WebError {
    fn from(err: TradesimError) -> Self {
        match &err {
            TradesimError::NotFound { .. } => Self::not_found(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("request failed: {}", self.message);
        }
        (
            self.status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_maps_not_found_to_domain_message() {
        let err = WebError::lookup(
            TradesimError::NotFound { entity: "product" },
            "Product not found",
        );
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Product not found");
    }

    #[test]
    fn lookup_passes_other_errors_through_as_500() {
        let err = WebError::lookup(
            TradesimError::DatabaseQuery {
                reason: "no such table: products".into(),
            },
            "Product not found",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "database query error: no such table: products");
    }
}
