//! Handlers for the `/genres` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Resource};
use yamdb_core::validation::{validate_name, validate_slug};
use yamdb_db::models::genre::{CreateGenre, Genre};
use yamdb_db::repositories::GenreRepo;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::MaybeAuthUser;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// GET /api/v1/genres
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<Json<Page<Genre>>> {
    let (limit, offset) = params.window();
    let search = params.term();

    let genres = GenreRepo::list(&state.pool, search, limit, offset).await?;
    let count = GenreRepo::count(&state.pool, search).await?;
    Ok(Json(Page::new(count, genres)))
}

/// POST /api/v1/genres
pub async fn create(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppJson(input): AppJson<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    caller.authorize(Resource::Genres, Action::Create, None)?;
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;

    let genre = GenreRepo::create(&state.pool, &input).await?;
    tracing::info!(slug = %genre.slug, "Genre created");
    Ok((StatusCode::CREATED, Json(genre)))
}

/// GET /api/v1/genres/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    AppPath(slug): AppPath<String>,
) -> AppResult<Json<Genre>> {
    let genre = GenreRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Genre", &slug))?;
    Ok(Json(genre))
}

/// DELETE /api/v1/genres/{slug}
///
/// Links to titles are removed; the titles themselves are kept.
pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(slug): AppPath<String>,
) -> AppResult<StatusCode> {
    caller.authorize(Resource::Genres, Action::Destroy, None)?;

    if GenreRepo::delete_by_slug(&state.pool, &slug).await? {
        tracing::info!(%slug, "Genre deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Genre", &slug).into())
    }
}
