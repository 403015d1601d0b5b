//! Caller identification.
//!
//! Authentication itself is an external collaborator (the OAuth sign-in flow
//! in front of this API); requests carry the resulting stable account id in
//! the `X-User-Id` header. Every store lookup is partitioned by this id.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::HttpAppError;
use driveflow_core::AppError;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// User context extracted from the `X-User-Id` header. Missing or empty gets a 401.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| UserContext {
                user_id: id.to_string(),
            })
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing X-User-Id header".to_string(),
                ))
            })
    }
}
