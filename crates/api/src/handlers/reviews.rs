//! Handlers for `/titles/{title_id}/reviews`.
//!
//! Every operation is scoped to the title in the path: a review that belongs
//! to another title is reported as missing.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_score, validate_text};
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::MaybeAuthUser;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i16,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i16>,
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list(
    State(state): State<AppState>,
    AppPath(title_id): AppPath<DbId>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title(&state.pool, title_id).await?;
    let (limit, offset) = params.window();

    let reviews = ReviewRepo::list_by_title(&state.pool, title_id, limit, offset).await?;
    let count = ReviewRepo::count_by_title(&state.pool, title_id).await?;
    Ok(Json(Page::new(count, reviews)))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// One review per author and title.
pub async fn create(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath(title_id): AppPath<DbId>,
    AppJson(input): AppJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    caller.authorize(Resource::Reviews, Action::Create, None)?;
    let author = caller.require()?.user;
    ensure_title(&state.pool, title_id).await?;

    validate_text(&input.text)?;
    validate_score(input.score)?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, author.id).await? {
        return Err(CoreError::Validation(
            "You have already reviewed this title".into(),
        )
        .into());
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            text: input.text,
            score: input.score,
            author_id: author.id,
            title_id,
        },
    )
    .await?;

    tracing::info!(review_id = review.id, title_id, author_id = author.id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath((title_id, id)): AppPath<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    Ok(Json(find_review(&state.pool, title_id, id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath((title_id, id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state.pool, title_id, id).await?;
    caller.authorize(Resource::Reviews, Action::PartialUpdate, Some(review.author_id))?;

    if let Some(text) = &input.text {
        validate_text(text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let review = ReviewRepo::update(
        &state.pool,
        id,
        &UpdateReview {
            text: input.text,
            score: input.score,
        },
    )
    .await?
    .ok_or_else(|| CoreError::not_found("Review", id))?;

    tracing::info!(review_id = id, title_id, "Review updated");
    Ok(Json(review))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath((title_id, id)): AppPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state.pool, title_id, id).await?;
    caller.authorize(Resource::Reviews, Action::Destroy, Some(review.author_id))?;

    ReviewRepo::delete(&state.pool, id).await?;
    tracing::info!(review_id = id, title_id, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn ensure_title(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    if TitleRepo::exists(pool, title_id).await? {
        Ok(())
    } else {
        Err(CoreError::not_found("Title", title_id).into())
    }
}

/// Load a review, requiring it to belong to `title_id`.
pub(crate) async fn find_review(pool: &DbPool, title_id: DbId, id: DbId) -> AppResult<Review> {
    ensure_title(pool, title_id).await?;
    ReviewRepo::find_in_title(pool, title_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", id).into())
}
