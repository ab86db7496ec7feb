//! Handlers for the `/users` resource.
//!
//! `/users/{username}` is admin-only, except for the literal segment `me`,
//! which resolves to the requesting user before any lookup happens.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Resource};
use yamdb_core::roles::Role;
use yamdb_core::validation::{
    validate_email, validate_person_name, validate_username, RESERVED_USERNAME,
};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// Which user a `/users/{username}` path refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// The requesting user.
    Me,
    ByUsername(String),
}

impl UserLookup {
    pub fn from_path(segment: &str) -> Self {
        if segment == RESERVED_USERNAME {
            UserLookup::Me
        } else {
            UserLookup::ByUsername(segment.to_string())
        }
    }
}

/// Body of `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: Role,
}

/// Body of `PATCH /users/{username}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    fn validate(&self) -> AppResult<()> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_person_name("first_name", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_person_name("last_name", last_name)?;
        }
        Ok(())
    }

    fn into_update(self) -> UpdateUser {
        UpdateUser {
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            role: self.role,
        }
    }
}

/// GET /api/v1/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let (limit, offset) = params.window();
    let search = params.term();

    let users = UserRepo::list(&state.pool, search, limit, offset).await?;
    let count = UserRepo::count(&state.pool, search).await?;

    Ok(Json(Page::new(
        count,
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/v1/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_person_name("first_name", &input.first_name)?;
    validate_person_name("last_name", &input.last_name)?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            is_staff: input.role == Role::Admin,
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            bio: input.bio,
            role: input.role,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.user.id,
        "User created"
    );
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get_by_username(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    caller: MaybeAuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = resolve_target(&state, &username, caller, Action::Retrieve).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{username}
///
/// Through `me`, a non-staff user cannot change their own role: a submitted
/// `role` is dropped.
pub async fn update(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    caller: MaybeAuthUser,
    AppJson(mut input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let is_self = UserLookup::from_path(&username) == UserLookup::Me;
    let target = resolve_target(&state, &username, caller, Action::PartialUpdate).await?;

    if is_self && !target.is_staff && input.role.take().is_some() {
        tracing::debug!(user_id = target.id, "Ignoring self-assigned role");
    }

    input.validate()?;

    let user = UserRepo::update(&state.pool, target.id, &input.into_update())
        .await?
        .ok_or_else(|| CoreError::not_found("User", &target.username))?;

    tracing::info!(user_id = user.id, "User updated");
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{username}
///
/// `DELETE /users/me` is refused with 405 before the caller is authenticated.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(username): AppPath<String>,
    headers: HeaderMap,
) -> AppResult<StatusCode> {
    let caller = match UserLookup::from_path(&username) {
        // Refused by the capability table; credentials are not inspected.
        UserLookup::Me => MaybeAuthUser(None),
        UserLookup::ByUsername(_) => MaybeAuthUser::from_headers(&headers, &state).await?,
    };
    let admin_id = caller.actor().map(|a| a.id);
    let user = resolve_target(&state, &username, caller, Action::Destroy).await?;

    UserRepo::delete(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, deleted_by = ?admin_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Authorize `action` and load the user a path segment refers to.
///
/// `me` needs only an authenticated caller and never hits the lookup.
/// Any other username needs an administrator.
async fn resolve_target(
    state: &AppState,
    segment: &str,
    caller: MaybeAuthUser,
    action: Action,
) -> AppResult<User> {
    match UserLookup::from_path(segment) {
        UserLookup::Me => {
            caller.authorize(Resource::Me, action, None)?;
            Ok(caller.require()?.user)
        }
        UserLookup::ByUsername(username) => {
            caller.authorize(Resource::Users, action, None)?;
            UserRepo::find_by_username(&state.pool, &username)
                .await?
                .ok_or_else(|| CoreError::not_found("User", &username).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_segment_resolves_to_caller() {
        assert_eq!(UserLookup::from_path("me"), UserLookup::Me);
        assert_eq!(
            UserLookup::from_path("alice"),
            UserLookup::ByUsername("alice".into())
        );
        assert_eq!(
            UserLookup::from_path("Me"),
            UserLookup::ByUsername("Me".into())
        );
    }
}
