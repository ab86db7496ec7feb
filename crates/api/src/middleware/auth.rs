//! JWT-based authentication extractors for Axum handlers.
//!
//! The token only identifies the user. Role and flags are reloaded from the
//! database on every request, so a role change or account deletion takes
//! effect immediately for tokens already issued.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Actor;
use yamdb_db::models::user::User;
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user.id, role = %user.user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's current database row.
    pub user: User,
}

impl AuthUser {
    /// The authorization view of the current user.
    pub fn actor(&self) -> Actor {
        self.user.actor()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;
        authenticate(&token, state).await
    }
}

/// Optional authentication for endpoints that anonymous callers may use.
///
/// A request without an `Authorization` header is anonymous. A request with
/// a malformed, expired or orphaned token is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    /// Resolve the caller from request headers.
    pub async fn from_headers(headers: &HeaderMap, state: &AppState) -> AppResult<Self> {
        match bearer_token(headers)? {
            Some(token) => Ok(MaybeAuthUser(Some(authenticate(&token, state).await?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }

    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(AuthUser::actor)
    }

    /// The authenticated user, or 401 for anonymous callers.
    pub fn require(self) -> AppResult<AuthUser> {
        self.0.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Authentication credentials were not provided".into(),
            ))
        })
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers, state).await
    }
}

/// The raw token from `Authorization: Bearer <token>`, if the header is present.
fn bearer_token(headers: &HeaderMap) -> AppResult<Option<String>> {
    let Some(header) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;
    Ok(Some(token.trim().to_string()))
}

async fn authenticate(token: &str, state: &AppState) -> AppResult<AuthUser> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    let user = UserRepo::find_by_id(&state.pool, claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = claims.sub, "Token subject no longer exists");
            AppError::Core(CoreError::Unauthorized("User not found".into()))
        })?;

    Ok(AuthUser { user })
}
