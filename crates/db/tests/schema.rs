//! Migration bookkeeping used by the health endpoint.

use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn migrated_database_has_no_pending_migrations(pool: PgPool) {
    assert_eq!(yamdb_db::pending_migrations(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = false)]
async fn unmigrated_database_reports_an_error(pool: PgPool) {
    assert!(yamdb_db::pending_migrations(&pool).await.is_err());
}

#[sqlx::test(migrations = false)]
async fn run_migrations_brings_schema_current(pool: PgPool) {
    yamdb_db::run_migrations(&pool).await.unwrap();
    assert_eq!(yamdb_db::pending_migrations(&pool).await.unwrap(), 0);
    yamdb_db::health_check(&pool).await.unwrap();
}
