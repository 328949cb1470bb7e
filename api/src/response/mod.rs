use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use services::ServiceError;
use std::collections::BTreeMap;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// ```json
/// {
///   "success": true,
///   "data": { ... },
///   "message": "Some message"
/// }
/// ```
///
/// - `T` is the type of the `data` payload.
/// - `success` is a boolean indicating operation status.
/// - `message` provides a human-readable context string.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Constructs a success response with the given data and message.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }

    /// An error response that still carries a payload (e.g. field errors).
    pub fn error_with(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }
}

/// Placeholder payload for responses without data.
#[derive(Serialize, Default)]
pub struct Empty {}

/// Field name to messages, the way a re-rendered form reports problems.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// `302 Found` pointing at `location`.
pub fn found(location: impl AsRef<str>) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.as_ref().to_owned())],
    )
        .into_response()
}

/// Redirect to the login page, remembering where the caller was headed.
pub fn login_redirect(next: &str) -> Response {
    let next = utf8_percent_encode(next, NON_ALPHANUMERIC);
    found(format!("/accounts/login/?next={next}"))
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}

/// Maps a service failure onto its HTTP status and envelope.
pub fn service_error(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(errors) => {
            let mut fields = FieldErrors::new();
            for (field, errs) in errors.field_errors() {
                fields.entry(field.to_string()).or_default().extend(
                    errs.iter().map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    }),
                );
            }
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error_with(fields, "Invalid input")),
            )
                .into_response()
        }
        ServiceError::NotFound(thing) => {
            error_response(StatusCode::NOT_FOUND, format!("{thing} not found"))
        }
        ServiceError::Database(e) => {
            tracing::error!(error = %e, "Database error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
