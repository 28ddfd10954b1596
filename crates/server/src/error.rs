//! HTTP error handling and response types.

use axum::{
    Json,
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::{services::booking::BookingError, store::StoreError};
use log::{error, warn};
use models::request::{REQUEST_FIELDS, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

/// Where the client should send the user to recover
pub const LOGIN_PAGE: &str = "/login";
pub const REQUEST_FORM: &str = "/room_request";

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Structured context, e.g. the names of missing fields
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    /// Whether repeating the request later may succeed
    pub retryable: bool,
    /// Page that lets the user recover, e.g. the request form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
            redirect: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn redirect_to(mut self, path: &str) -> Self {
        self.redirect = Some(path.to_string());
        self
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("could not read the search form: {0}")]
    MalformedForm(String),

    #[error("not logged in")]
    Unauthenticated,

    #[error("no search has been made in this session")]
    NoSavedQuery,

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        let message = self.to_string();

        match self {
            AppError::Validation(e) => {
                let (code, details) = match e {
                    ValidationError::MissingField(fields) => {
                        ("MISSING_FIELD", Some(json!({ "fields": fields })))
                    }
                    ValidationError::InvalidField { field, value } => (
                        "INVALID_FIELD",
                        Some(json!({ "field": field, "value": value })),
                    ),
                    ValidationError::InvalidTimeRange { .. } => ("INVALID_TIME_RANGE", None),
                    ValidationError::NoSemesterForDate(_) => ("NO_SEMESTER_FOR_DATE", None),
                };
                let body = ApiError::new(code, message).redirect_to(REQUEST_FORM);
                let body = match details {
                    Some(details) => body.with_details(details),
                    None => body,
                };
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::MalformedForm(_) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_FIELD", message).redirect_to(REQUEST_FORM),
            ),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHENTICATED", message).redirect_to(LOGIN_PAGE),
            ),
            AppError::NoSavedQuery => (
                StatusCode::BAD_REQUEST,
                ApiError::new("MISSING_FIELD", message).redirect_to(REQUEST_FORM),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message)),
            AppError::Booking(BookingError::RoomNotFound(_)) => {
                (StatusCode::NOT_FOUND, ApiError::new("ROOM_NOT_FOUND", message))
            }
            AppError::Booking(BookingError::TooSmall { .. }) => (
                StatusCode::CONFLICT,
                ApiError::new("ROOM_TOO_SMALL", message).redirect_to(REQUEST_FORM),
            ),
            AppError::Booking(BookingError::Unavailable(_)) => (
                StatusCode::CONFLICT,
                ApiError::new("ROOM_UNAVAILABLE", message).redirect_to(REQUEST_FORM),
            ),
            AppError::Booking(BookingError::Store(e)) | AppError::Store(e) => store_failure(e),
        }
    }
}

/// Storage faults are never reported as an empty result
fn store_failure(e: &StoreError) -> (StatusCode, ApiError) {
    if e.is_retryable() {
        warn!("Storage backend unavailable: {e}");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new(
                "BACKEND_UNAVAILABLE",
                "room data is temporarily unavailable, please try again",
            )
            .retryable(),
        )
    } else {
        error!("Storage error: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", "internal error"),
        )
    }
}

/// A submission that is not a form at all counts as an empty one
impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::InvalidFormContentType(_) => {
                ValidationError::MissingField(REQUEST_FIELDS.to_vec()).into()
            }
            other => AppError::MalformedForm(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let (status, body) =
            AppError::from(ValidationError::MissingField(vec!["select_date"])).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "MISSING_FIELD");
        assert_eq!(body.redirect.as_deref(), Some(REQUEST_FORM));
        assert!(body.message.contains("select_date"));
        assert_eq!(body.details, Some(json!({ "fields": ["select_date"] })));
    }

    #[test]
    fn test_outage_is_retryable_service_unavailable() {
        let (status, body) =
            AppError::from(StoreError::Unavailable("timeout".into())).status_and_body();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "BACKEND_UNAVAILABLE");
        assert!(body.retryable);

        let (status, _) = AppError::from(BookingError::Store(StoreError::Unavailable("x".into())))
            .status_and_body();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_booking_errors() {
        let id = Uuid::nil();
        let (status, _) = AppError::from(BookingError::RoomNotFound(id)).status_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = AppError::from(BookingError::Unavailable(id)).status_and_body();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "ROOM_UNAVAILABLE");
    }

    #[test]
    fn test_malformed_form_points_back_to_request_form() {
        let (status, body) =
            AppError::MalformedForm("duplicate field `select_time`".into()).status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "INVALID_FIELD");
        assert_eq!(body.redirect.as_deref(), Some(REQUEST_FORM));
        assert!(body.message.contains("select_time"));
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let (status, body) = AppError::Unauthenticated.status_and_body();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.redirect.as_deref(), Some(LOGIN_PAGE));
    }
}
