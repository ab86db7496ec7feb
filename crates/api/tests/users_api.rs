//! HTTP-level integration tests for `/users` and `/users/me`.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, delete_auth, get, get_auth, patch_json_auth, post_json_auth};
use serde_json::json;
use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

/// Admins list users ordered by username, with count and search.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_lists_and_searches_users(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "root", Role::Admin).await;
    common::create_user(&pool, "carol", Role::User).await;
    common::create_user(&pool, "alice", Role::Moderator).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 3);
    let names: Vec<&str> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "carol", "root"]);
    assert!(json["results"][0].get("confirmation_code_hash").is_none());

    let response = get_auth(app, "/api/v1/users?search=CAR", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["username"], "carol");
}

/// Pagination limits the page but not the count.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_list_pagination(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "root", Role::Admin).await;
    for name in ["u1", "u2", "u3"] {
        common::create_user(&pool, name, Role::User).await;
    }
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/users?limit=2&offset=1", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 4);
    assert_eq!(json["results"].as_array().unwrap().len(), 2);
    assert_eq!(json["results"][0]["username"], "u1");
}

/// Non-admins get 403, anonymous callers 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_user_management_requires_admin(pool: PgPool) {
    let (_mod, token) = common::user_with_token(&pool, "modest", Role::Moderator).await;
    common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(app.clone(), "/api/v1/users").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(app, "/api/v1/users/alice").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A superuser without the admin role still passes the admin check.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_superuser_is_admin(pool: PgPool) {
    let user = common::create_user(&pool, "su", Role::User).await;
    sqlx::query("UPDATE users SET is_superuser = TRUE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
    let token = common::token_for(&user);
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Admin creates a user; role admin also grants staff.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_user(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool.clone());

    let body = json!({
        "username": "newadmin",
        "email": "new@x.com",
        "first_name": "New",
        "role": "admin"
    });
    let response = post_json_auth(app.clone(), "/api/v1/users", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["role"], "admin");
    assert_eq!(json["first_name"], "New");
    assert_eq!(json["bio"], "");

    let created = UserRepo::find_by_username(&pool, "newadmin")
        .await
        .unwrap()
        .unwrap();
    assert!(created.is_staff);

    // Duplicate username -> 400.
    let dup = json!({ "username": "newadmin", "email": "other@x.com" });
    let response = post_json_auth(app.clone(), "/api/v1/users", dup, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown role -> 400.
    let bad_role = json!({ "username": "x", "email": "x@x.com", "role": "overlord" });
    let response = post_json_auth(app, "/api/v1/users", bad_role, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Admin retrieves, updates and deletes by username.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_retrieve_update_delete(pool: PgPool) {
    let (_admin, token) = common::user_with_token(&pool, "root", Role::Admin).await;
    common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], "alice@test.com");

    let patch = json!({ "role": "moderator", "bio": "hi" });
    let response = patch_json_auth(app.clone(), "/api/v1/users/alice", patch, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "moderator");
    assert_eq!(json["bio"], "hi");

    let response = delete_auth(app.clone(), "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/v1/users/alice", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// /users/me
// ---------------------------------------------------------------------------

/// Any authenticated user can read and edit their own record.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_get_and_patch(pool: PgPool) {
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app.clone(), "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "bob");

    let patch = json!({ "first_name": "Bobby", "bio": "reviewer" });
    let response = patch_json_auth(app, "/api/v1/users/me", patch, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["first_name"], "Bobby");
    assert_eq!(json["bio"], "reviewer");
}

/// A non-staff user's self-assigned role is silently ignored.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_patch_ignores_role_for_non_staff(pool: PgPool) {
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let patch = json!({ "role": "admin", "bio": "sneaky" });
    let response = patch_json_auth(app, "/api/v1/users/me", patch, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "user");
    assert_eq!(json["bio"], "sneaky");
}

/// Staff may change their own role through `me`.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_patch_allows_role_for_staff(pool: PgPool) {
    let (_root, token) = common::user_with_token(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool);

    let patch = json!({ "role": "moderator" });
    let response = patch_json_auth(app, "/api/v1/users/me", patch, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "moderator");
}

/// `DELETE /users/me` is 405 for everyone, even admins and anonymous callers.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_delete_not_allowed(pool: PgPool) {
    let (_root, token) = common::user_with_token(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = delete_auth(app.clone(), "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = delete(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

/// Self-update validation still applies.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_me_patch_validates_fields(pool: PgPool) {
    let (_bob, token) = common::user_with_token(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let patch = json!({ "email": "broken" });
    let response = patch_json_auth(app.clone(), "/api/v1/users/me", patch, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let patch = json!({ "username": "me" });
    let response = patch_json_auth(app, "/api/v1/users/me", patch, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
