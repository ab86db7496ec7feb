//! Role-based access control.
//!
//! [`RequireAdmin`] guards the user-management endpoints at the type level.
//! Everything else goes through [`MaybeAuthUser::authorize`], which consults
//! the capability table in `yamdb_core::permissions`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, is_admin, Action, Resource};
use yamdb_core::types::DbId;

use super::auth::{AuthUser, MaybeAuthUser};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires role `admin` or a superuser. Rejects anonymous callers with 401
/// and everyone else with 403.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !is_admin(Some(&user.actor())) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

impl MaybeAuthUser {
    /// Check the capability table for this request.
    ///
    /// Pass `author_id` when acting on an existing review or comment.
    pub fn authorize(
        &self,
        resource: Resource,
        action: Action,
        author_id: Option<DbId>,
    ) -> AppResult<()> {
        let actor = self.actor();
        authorize(resource, action, actor.as_ref(), author_id).map_err(|err| {
            tracing::debug!(?resource, ?action, actor = ?actor.as_ref().map(|a| a.id), "Request denied");
            AppError::Core(err)
        })
    }
}
