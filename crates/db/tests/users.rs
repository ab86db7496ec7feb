//! Integration tests for the user repository.

use sqlx::PgPool;
use yamdb_core::confirmation::issue_code;
use yamdb_core::roles::Role;
use yamdb_db::models::user::{CreateUser, UpdateUser};
use yamdb_db::repositories::UserRepo;

#[sqlx::test(migrations = "./migrations")]
async fn signup_user_defaults_to_user_role(pool: PgPool) {
    let user = UserRepo::create(&pool, &CreateUser::signup("bob", "b@x.com"))
        .await
        .unwrap();

    assert_eq!(user.role, Role::User);
    assert!(!user.is_staff);
    assert!(!user.is_superuser);
    assert!(user.confirmation_code_hash.is_none());
    assert_eq!(user.bio, "");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_or_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &CreateUser::signup("bob", "b@x.com"))
        .await
        .unwrap();

    for dup in [
        CreateUser::signup("bob", "other@x.com"),
        CreateUser::signup("robert", "b@x.com"),
    ] {
        let err = UserRepo::create(&pool, &dup).await.unwrap_err();
        let db_err = err.as_database_error().expect("database error");
        assert_eq!(db_err.code().as_deref(), Some("23505"));
        assert!(db_err.constraint().unwrap().starts_with("uq_users_"));
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn list_orders_by_username_and_filters_by_search(pool: PgPool) {
    for (name, email) in [("carol", "c@x.com"), ("alice", "a@x.com"), ("malice", "m@x.com")] {
        UserRepo::create(&pool, &CreateUser::signup(name, email))
            .await
            .unwrap();
    }

    let all = UserRepo::list(&pool, None, 10, 0).await.unwrap();
    let names: Vec<_> = all.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["alice", "carol", "malice"]);

    let found = UserRepo::list(&pool, Some("ALIC"), 10, 0).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(UserRepo::count(&pool, Some("alic")).await.unwrap(), 2);
    assert_eq!(UserRepo::count(&pool, None).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn partial_update_keeps_untouched_fields(pool: PgPool) {
    let user = UserRepo::create(&pool, &CreateUser::signup("dave", "d@x.com"))
        .await
        .unwrap();

    let update = UpdateUser {
        bio: Some("Film buff".into()),
        role: Some(Role::Moderator),
        ..UpdateUser::default()
    };
    let updated = UserRepo::update(&pool, user.id, &update)
        .await
        .unwrap()
        .expect("user exists");

    assert_eq!(updated.bio, "Film buff");
    assert_eq!(updated.role, Role::Moderator);
    assert_eq!(updated.email, "d@x.com");
    assert!(UserRepo::update(&pool, 999_999, &update).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn confirmation_code_is_consumed_once(pool: PgPool) {
    let user = UserRepo::create(&pool, &CreateUser::signup("erin", "e@x.com"))
        .await
        .unwrap();
    let code = issue_code();
    UserRepo::set_confirmation_code_hash(&pool, user.id, &code.hash)
        .await
        .unwrap();

    assert!(UserRepo::consume_confirmation_code(&pool, user.id, &code.hash)
        .await
        .unwrap());
    assert!(!UserRepo::consume_confirmation_code(&pool, user.id, &code.hash)
        .await
        .unwrap());

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.confirmation_code_hash.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_role_text_is_rejected_by_check_constraint(pool: PgPool) {
    let result = sqlx::query("INSERT INTO users (username, email, role) VALUES ('x', 'x@x.com', 'root')")
        .execute(&pool)
        .await;
    assert!(result.is_err());
}
