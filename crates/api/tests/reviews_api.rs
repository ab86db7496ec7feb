//! HTTP-level integration tests for reviews and comments nested under titles.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete, delete_auth, get, patch_json, patch_json_auth, post_json, post_json_auth,
};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;
use yamdb_db::models::title::CreateTitle;
use yamdb_db::repositories::TitleRepo;

async fn seed_title(pool: &PgPool, name: &str) -> DbId {
    TitleRepo::create(
        pool,
        &CreateTitle {
            name: name.into(),
            year: 1995,
            description: None,
            category_id: None,
            genre_ids: vec![],
        },
    )
    .await
    .unwrap()
    .id
}

async fn post_review(app: axum::Router, title_id: DbId, token: &str, score: i64) -> DbId {
    let body = json!({ "text": "Solid", "score": score });
    let response = post_json_auth(
        app,
        &format!("/api/v1/titles/{title_id}/reviews"),
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// An authenticated user reviews a title; anyone can read it.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_and_read_review(pool: PgPool) {
    let title_id = seed_title(&pool, "Heat").await;
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let body = json!({ "text": "Great heist film", "score": 9 });
    let uri = format!("/api/v1/titles/{title_id}/reviews");
    let response = post_json_auth(app.clone(), &uri, body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let review = body_json(response).await;
    assert_eq!(review["author"], "bob");
    assert_eq!(review["score"], 9);
    assert!(review["pub_date"].is_string());
    assert!(review.get("title_id").is_none());

    let response = get(app.clone(), &uri).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["text"], "Great heist film");

    let response = get(app, &format!("{uri}/{}", review["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// A second review of the same title by the same author is 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_one_review_per_author_and_title(pool: PgPool) {
    let title_id = seed_title(&pool, "Heat").await;
    let other_id = seed_title(&pool, "Ronin").await;
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    post_review(app.clone(), title_id, &token, 8).await;

    let body = json!({ "text": "Again", "score": 3 });
    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/titles/{title_id}/reviews"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A different title is fine.
    post_review(app, other_id, &token, 6).await;
}

/// Score bounds, blank text, anonymous posting and missing titles.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_validation_and_auth(pool: PgPool) {
    let title_id = seed_title(&pool, "Heat").await;
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/titles/{title_id}/reviews");

    for score in [0, 11] {
        let body = json!({ "text": "x", "score": score });
        let response = post_json_auth(app.clone(), &uri, body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let blank = json!({ "text": "  ", "score": 5 });
    let response = post_json_auth(app.clone(), &uri, blank, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "text": "x", "score": 5 });
    let response = post_json(app.clone(), &uri, body.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response =
        post_json_auth(app.clone(), "/api/v1/titles/999999/reviews", body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, "/api/v1/titles/999999/reviews").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A review is only reachable through its own title.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_scoped_to_title(pool: PgPool) {
    let heat = seed_title(&pool, "Heat").await;
    let ronin = seed_title(&pool, "Ronin").await;
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let review_id = post_review(app.clone(), heat, &token, 7).await;

    let response = get(app, &format!("/api/v1/titles/{ronin}/reviews/{review_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Author, moderator and admin may edit or delete; others may not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_author_or_elevated(pool: PgPool) {
    let title_id = seed_title(&pool, "Heat").await;
    let (_bob, bob) = common::user_with_token(&pool, "bob", Role::User).await;
    let (_eve, eve) = common::user_with_token(&pool, "eve", Role::User).await;
    let (_mod, moderator) = common::user_with_token(&pool, "modest", Role::Moderator).await;
    let app = common::build_test_app(pool);

    let review_id = post_review(app.clone(), title_id, &bob, 7).await;
    let uri = format!("/api/v1/titles/{title_id}/reviews/{review_id}");

    let response = patch_json(app.clone(), &uri, json!({ "score": 1 })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = patch_json_auth(app.clone(), &uri, json!({ "score": 1 }), &eve).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(app.clone(), &uri, json!({ "score": 10 }), &bob).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 10);
    assert_eq!(json["text"], "Solid");

    let response = patch_json_auth(app.clone(), &uri, json!({ "text": "Edited" }), &moderator).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["author"], "bob");

    let response = delete_auth(app.clone(), &uri, &eve).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete_auth(app.clone(), &uri, &moderator).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Comment lifecycle under a review, with the author-or-elevated policy.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_lifecycle(pool: PgPool) {
    let title_id = seed_title(&pool, "Heat").await;
    let (_bob, bob) = common::user_with_token(&pool, "bob", Role::User).await;
    let (_eve, eve) = common::user_with_token(&pool, "eve", Role::User).await;
    let (_root, admin) = common::user_with_token(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool);

    let review_id = post_review(app.clone(), title_id, &bob, 8).await;
    let list_uri = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");

    let response =
        post_json_auth(app.clone(), &list_uri, json!({ "text": "Agreed" }), &eve).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = body_json(response).await;
    assert_eq!(comment["author"], "eve");
    assert!(comment.get("score").is_none());
    let uri = format!("{list_uri}/{}", comment["id"]);

    let response = get(app.clone(), &list_uri).await;
    assert_eq!(body_json(response).await["count"], 1);

    let response = patch_json_auth(app.clone(), &uri, json!({ "text": "Hijack" }), &bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(app.clone(), &uri, json!({ "text": "Strongly agreed" }), &eve).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["text"], "Strongly agreed");

    let response = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Comments require the review to belong to the title in the path.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_comments_scoped_to_title_and_review(pool: PgPool) {
    let heat = seed_title(&pool, "Heat").await;
    let ronin = seed_title(&pool, "Ronin").await;
    let (_bob, bob) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let review_id = post_review(app.clone(), heat, &bob, 8).await;

    let wrong_title = format!("/api/v1/titles/{ronin}/reviews/{review_id}/comments");
    let response = get(app.clone(), &wrong_title).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(app.clone(), &wrong_title, json!({ "text": "x" }), &bob).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let anonymous = format!("/api/v1/titles/{heat}/reviews/{review_id}/comments");
    let response = post_json(app, &anonymous, json!({ "text": "x" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Deleting a title removes its reviews and their comments.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_title_delete_cascades(pool: PgPool) {
    let title_id = seed_title(&pool, "Heat").await;
    let (_bob, bob) = common::user_with_token(&pool, "bob", Role::User).await;
    let (_root, admin) = common::user_with_token(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool.clone());

    let review_id = post_review(app.clone(), title_id, &bob, 8).await;
    let comments = format!("/api/v1/titles/{title_id}/reviews/{review_id}/comments");
    post_json_auth(app.clone(), &comments, json!({ "text": "x" }), &bob).await;

    let response = delete_auth(app, &format!("/api/v1/titles/{title_id}"), &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
