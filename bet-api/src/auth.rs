use axum::{extract::FromRequestParts, http::request::Parts};

use crate::responses::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller, as asserted by the gateway in front of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| CallerId(id.to_string()))
            .ok_or_else(ApiError::unauthorized)
    }
}
