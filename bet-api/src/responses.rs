use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bet_engine::{Error as EngineError, UpdateRejection, ValidationError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

/// `{"success": true, "data": ...}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// Error response: `{"success": false, "error": {"message", "code"}}`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn invalid_json() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_JSON", "Invalid JSON in request body")
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Missing x-user-id header")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn unparseable_slip() -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "PARSER_ERROR",
            "Could not confidently parse this bet slip",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": { "message": self.message, "code": self.code }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.0)
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MalformedOutput(_) => Self::unparseable_slip(),
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<UpdateRejection> for ApiError {
    fn from(err: UpdateRejection) -> Self {
        match err {
            UpdateRejection::Forbidden { .. } => Self::forbidden(err.to_string()),
            UpdateRejection::UnknownLeg(_) => Self::not_found(err.to_string()),
            UpdateRejection::Invalid(e) => e.into(),
        }
    }
}

/// Read a JSON body, separating syntax errors from shape errors.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::invalid_json())?;
    serde_json::from_value(value).map_err(|e| ApiError::validation(e.to_string()))
}
