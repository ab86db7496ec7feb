use axum::routing::get;
use axum::Router;

use crate::handlers::genres;
use crate::state::AppState;

/// Routes mounted at `/genres`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{slug}    -> get_by_slug
/// DELETE /{slug}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(genres::list).post(genres::create))
        .route("/{slug}", get(genres::get_by_slug).delete(genres::delete))
}
