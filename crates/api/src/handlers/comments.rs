//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{Action, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::validate_text;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::repositories::CommentRepo;
use yamdb_db::DbPool;

use super::reviews::find_review;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::auth::MaybeAuthUser;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list(
    State(state): State<AppState>,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppQuery(params): AppQuery<PaginationParams>,
) -> AppResult<Json<Page<Comment>>> {
    find_review(&state.pool, title_id, review_id).await?;
    let (limit, offset) = params.window();

    let comments = CommentRepo::list_by_review(&state.pool, review_id, limit, offset).await?;
    let count = CommentRepo::count_by_review(&state.pool, review_id).await?;
    Ok(Json(Page::new(count, comments)))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath((title_id, review_id)): AppPath<(DbId, DbId)>,
    AppJson(input): AppJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    caller.authorize(Resource::Comments, Action::Create, None)?;
    let author = caller.require()?.user;
    find_review(&state.pool, title_id, review_id).await?;
    validate_text(&input.text)?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            text: input.text,
            author_id: author.id,
            review_id,
        },
    )
    .await?;

    tracing::info!(comment_id = comment.id, review_id, author_id = author.id, "Comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath((title_id, review_id, id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    Ok(Json(find_comment(&state.pool, title_id, review_id, id).await?))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath((title_id, review_id, id)): AppPath<(DbId, DbId, DbId)>,
    AppJson(input): AppJson<UpdateCommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state.pool, title_id, review_id, id).await?;
    caller.authorize(Resource::Comments, Action::PartialUpdate, Some(comment.author_id))?;

    if let Some(text) = &input.text {
        validate_text(text)?;
    }

    let comment = CommentRepo::update(&state.pool, id, &UpdateComment { text: input.text })
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", id))?;

    tracing::info!(comment_id = id, review_id, "Comment updated");
    Ok(Json(comment))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: MaybeAuthUser,
    AppPath((title_id, review_id, id)): AppPath<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state.pool, title_id, review_id, id).await?;
    caller.authorize(Resource::Comments, Action::Destroy, Some(comment.author_id))?;

    CommentRepo::delete(&state.pool, id).await?;
    tracing::info!(comment_id = id, review_id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_comment(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
    id: DbId,
) -> AppResult<Comment> {
    find_review(pool, title_id, review_id).await?;
    CommentRepo::find_in_review(pool, review_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", id).into())
}
