//! Handlers for the `/titles` resource.
//!
//! Reads return [`TitleDetail`] (nested category and genres plus the derived
//! rating). Writes accept and return slugs ([`TitleWriteView`]).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Deserializer};
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_name, validate_year};
use yamdb_db::models::title::{CreateTitle, TitleDetail, TitleWriteView, UpdateTitle};
use yamdb_db::repositories::{CategoryRepo, GenreRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::MaybeAuthUser;
use crate::query::TitleListParams;
use crate::response::Page;
use crate::state::AppState;

/// Body of `POST /titles`.
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Genre slugs.
    #[serde(default)]
    pub genre: Vec<String>,
}

/// Body of `PATCH /titles/{id}`. `genre`, when present, replaces the full set.
///
/// An explicit `null` for `description` or `category` clears it; an absent
/// field keeps the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
}

/// Marks a field that appeared in the body, so `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// GET /api/v1/titles
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TitleListParams>,
) -> AppResult<Json<Page<TitleDetail>>> {
    let (limit, offset) = params.window();
    let filter = params.filter()?;

    let titles = TitleRepo::list_detail(&state.pool, &filter, limit, offset).await?;
    let count = TitleRepo::count(&state.pool, &filter).await?;
    Ok(Json(Page::new(count, titles)))
}

/// POST /api/v1/titles
pub async fn create(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppJson(input): AppJson<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleWriteView>)> {
    caller.authorize(Resource::Titles, Action::Create, None)?;
    validate_name(&input.name)?;
    validate_year(input.year)?;

    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state.pool, slug).await?),
        None => None,
    };
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let title = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?;

    tracing::info!(title_id = title.id, "Title created");
    Ok((StatusCode::CREATED, Json(write_view(&state.pool, title.id).await?)))
}

/// GET /api/v1/titles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<TitleDetail>> {
    let title = TitleRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id))?;
    Ok(Json(title))
}

/// PATCH /api/v1/titles/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateTitleRequest>,
) -> AppResult<Json<TitleWriteView>> {
    caller.authorize(Resource::Titles, Action::PartialUpdate, None)?;

    if !TitleRepo::exists(&state.pool, id).await? {
        return Err(CoreError::not_found("Title", id).into());
    }
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(year) = input.year {
        validate_year(year)?;
    }

    let category_id = match &input.category {
        Some(Some(slug)) => Some(Some(resolve_category(&state.pool, slug).await?)),
        Some(None) => Some(None),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    TitleRepo::update(
        &state.pool,
        id,
        &UpdateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Title", id))?;

    tracing::info!(title_id = id, "Title updated");
    Ok(Json(write_view(&state.pool, id).await?))
}

/// DELETE /api/v1/titles/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    caller.authorize(Resource::Titles, Action::Destroy, None)?;

    if TitleRepo::delete(&state.pool, id).await? {
        tracing::info!(title_id = id, "Title deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Title", id).into())
    }
}

async fn resolve_category(pool: &DbPool, slug: &str) -> AppResult<DbId> {
    CategoryRepo::find_by_slug(pool, slug)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| {
            CoreError::Validation(format!("category: unknown slug '{slug}'")).into()
        })
}

async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    if slugs.is_empty() {
        return Ok(Vec::new());
    }
    let genres = GenreRepo::find_by_slugs(pool, slugs).await?;

    let unknown: Vec<&str> = slugs
        .iter()
        .filter(|slug| !genres.iter().any(|g| &g.slug == *slug))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(CoreError::Validation(format!(
            "genre: unknown slug(s) {}",
            unknown.join(", ")
        ))
        .into());
    }

    Ok(genres.into_iter().map(|g| g.id).collect())
}

async fn write_view(pool: &DbPool, id: DbId) -> AppResult<TitleWriteView> {
    TitleRepo::find_write_view(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", id).into())
}
