use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create
/// GET    /{username}    -> get_by_username   (`me` = caller)
/// PATCH  /{username}    -> update            (`me` = caller)
/// DELETE /{username}    -> delete            (`me` -> 405)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route(
            "/{username}",
            get(users::get_by_username)
                .patch(users::update)
                .delete(users::delete),
        )
}
