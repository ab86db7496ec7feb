//! Handlers for the `/categories` resource. Objects are addressed by slug.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Resource};
use yamdb_core::validation::{validate_name, validate_slug};
use yamdb_db::models::category::{Category, CreateCategory};
use yamdb_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::MaybeAuthUser;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Page<Category>>> {
    let (limit, offset) = params.window();
    let search = params.term();

    let categories = CategoryRepo::list(&state.pool, search, limit, offset).await?;
    let count = CategoryRepo::count(&state.pool, search).await?;
    Ok(Json(Page::new(count, categories)))
}

/// POST /api/v1/categories
pub async fn create(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppJson(input): AppJson<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    caller.authorize(Resource::Categories, Action::Create, None)?;
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;

    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(slug = %category.slug, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/categories/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Category", &slug))?;
    Ok(Json(category))
}

/// DELETE /api/v1/categories/{slug}
///
/// Titles in the category keep existing with `category: null`.
pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    caller.authorize(Resource::Categories, Action::Destroy, None)?;

    if CategoryRepo::delete_by_slug(&state.pool, &slug).await? {
        tracing::info!(%slug, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Category", &slug).into())
    }
}
