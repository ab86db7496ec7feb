use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`. There is no update route.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create
/// GET    /{slug}    -> get_by_slug
/// DELETE /{slug}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{slug}",
            get(categories::get_by_slug).delete(categories::delete),
        )
}
