//! Bearer-token authentication extractor.
//!
//! Handlers that take [`RequireAuth`] only run for requests carrying a valid
//! access token. The token is read from `Authorization: Bearer <token>` or,
//! for older clients, from a bare `token` header.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Legacy header some clients send the raw token in.
pub const LEGACY_TOKEN_HEADER: &str = "token";

const UNAUTHORIZED_MESSAGE: &str = "Not authorized, login again";

/// Extractor that requires a valid access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.id)
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_owned()))?;

        let user_id = state.tokens().verify(token)?;

        tracing::Span::current().record("user_id", tracing::field::display(user_id));
        set_sentry_user(&user_id);

        Ok(Self(CurrentUser { id: user_id }))
    }
}

/// Pull the raw token out of the request headers.
///
/// `Authorization: Bearer` wins over the legacy header when both are present.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::trim);

    bearer
        .or_else(|| {
            headers
                .get(LEGACY_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
        .filter(|t| !t.is_empty())
}
