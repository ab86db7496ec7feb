//! Handlers for `/auth`: signup and confirmation-code exchange.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use yamdb_core::confirmation::{hash_code, issue_code, verify_code};
use yamdb_core::error::CoreError;
use yamdb_core::validation::{validate_email, validate_username};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Request and response body for `POST /auth/signup`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /api/v1/auth/signup
///
/// Creates the account on first call and (re)issues a confirmation code on
/// every call. A username or email already bound to a different partner is
/// rejected without touching the existing account.
pub async fn signup(
    State(state): State<AppState>,
    AppJson(input): AppJson<SignupRequest>,
) -> AppResult<Json<SignupRequest>> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;

    let user = find_or_create_signup_user(&state, &input).await?;

    let code = issue_code();
    UserRepo::set_confirmation_code_hash(&state.pool, user.id, &code.hash).await?;

    if let Err(e) = state
        .mailer
        .send_code(&user.email, &user.username, &code.plaintext)
        .await
    {
        tracing::error!(error = %e, user_id = user.id, "Failed to deliver confirmation code");
    }

    tracing::info!(user_id = user.id, username = %user.username, "Confirmation code issued");
    Ok(Json(input))
}

async fn find_or_create_signup_user(state: &AppState, input: &SignupRequest) -> AppResult<User> {
    match UserRepo::find_by_username(&state.pool, &input.username).await? {
        Some(user) if user.email == input.email => Ok(user),
        Some(_) => Err(CoreError::Validation(
            "username: already registered with a different email".into(),
        )
        .into()),
        None => {
            if UserRepo::find_by_email(&state.pool, &input.email)
                .await?
                .is_some()
            {
                return Err(CoreError::Validation(
                    "email: already registered with a different username".into(),
                )
                .into());
            }
            let user =
                UserRepo::create(&state.pool, &CreateUser::signup(&input.username, &input.email))
                    .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User signed up");
            Ok(user)
        }
    }
}

/// POST /api/v1/auth/token
///
/// Exchanges a pending confirmation code for an access token. The code is
/// cleared on success and cannot be reused.
pub async fn token(
    State(state): State<AppState>,
    AppJson(input): AppJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    if input.username.trim().is_empty() {
        return Err(CoreError::Validation("username: this field may not be blank".into()).into());
    }

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.username))?;

    if !verify_code(
        &input.confirmation_code,
        user.confirmation_code_hash.as_deref(),
    ) {
        tracing::debug!(user_id = user.id, "Confirmation code rejected");
        return Err(invalid_code());
    }

    let consumed = UserRepo::consume_confirmation_code(
        &state.pool,
        user.id,
        &hash_code(&input.confirmation_code),
    )
    .await?;
    if !consumed {
        return Err(invalid_code());
    }

    let token = generate_access_token(user.id, user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");
    Ok(Json(TokenResponse { token }))
}

fn invalid_code() -> AppError {
    CoreError::Validation("confirmation_code: invalid or already used".into()).into()
}
