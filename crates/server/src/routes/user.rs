//! Registration and login.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::response::{ApiJson, ApiResponse};
use crate::services::AccountService;
use crate::state::AppState;

/// Registration form.
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login form.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Create an account and return an access token for it.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<ApiResponse<TokenResponse>> {
    let user = AccountService::new(state.users())
        .register(&body.name, &body.email, &body.password)
        .await?;

    let token = state.tokens().issue(user.id)?;
    Ok(ApiResponse::with_message(
        "Account created",
        TokenResponse {
            token: token.into_inner(),
        },
    ))
}

/// Exchange email and password for an access token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<ApiResponse<TokenResponse>> {
    let user = AccountService::new(state.users())
        .login(&body.email, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");
    let token = state.tokens().issue(user.id)?;
    Ok(ApiResponse::data(TokenResponse {
        token: token.into_inner(),
    }))
}
