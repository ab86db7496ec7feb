//! Route definitions for the `/titles` resource.
//!
//! Also nests reviews under `/titles/{title_id}/reviews` and comments under
//! `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{comments, reviews, titles};
use crate::state::AppState;

/// Routes mounted at `/titles`.
///
/// ```text
/// GET    /                                              -> titles::list
/// POST   /                                              -> titles::create
/// GET    /{title_id}                                    -> titles::get_by_id
/// PATCH  /{title_id}                                    -> titles::update
/// DELETE /{title_id}                                    -> titles::delete
///
/// GET    /{title_id}/reviews                            -> reviews::list
/// POST   /{title_id}/reviews                            -> reviews::create
/// GET    /{title_id}/reviews/{review_id}                -> reviews::get_by_id
/// PATCH  /{title_id}/reviews/{review_id}                -> reviews::update
/// DELETE /{title_id}/reviews/{review_id}                -> reviews::delete
///
/// GET    /{title_id}/reviews/{review_id}/comments       -> comments::list
/// POST   /{title_id}/reviews/{review_id}/comments       -> comments::create
/// GET    /{title_id}/reviews/{review_id}/comments/{id}  -> comments::get_by_id
/// PATCH  /{title_id}/reviews/{review_id}/comments/{id}  -> comments::update
/// DELETE /{title_id}/reviews/{review_id}/comments/{id}  -> comments::delete
/// ```
///
/// Parameters at the same depth share a name, as the router requires.
/// `PUT` is not routed anywhere and answers 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(titles::list).post(titles::create))
        .route(
            "/{title_id}",
            get(titles::get_by_id)
                .patch(titles::update)
                .delete(titles::delete),
        )
        .route(
            "/{title_id}/reviews",
            get(reviews::list).post(reviews::create),
        )
        .route(
            "/{title_id}/reviews/{review_id}",
            get(reviews::get_by_id)
                .patch(reviews::update)
                .delete(reviews::delete),
        )
        .route(
            "/{title_id}/reviews/{review_id}/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/{title_id}/reviews/{review_id}/comments/{id}",
            get(comments::get_by_id)
                .patch(comments::update)
                .delete(comments::delete),
        )
}
