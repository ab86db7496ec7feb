//! Repository for the `titles` table and its `genre_title` links.
//!
//! The rating is aggregated at query time (`AVG(reviews.score)`) and never
//! stored.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, Transaction};
use yamdb_core::rating::rating_from_average;
use yamdb_core::types::DbId;

use super::contains_pattern;
use crate::models::category::Category;
use crate::models::genre::Genre;
use crate::models::title::{
    CreateTitle, Title, TitleDetail, TitleFilter, TitleWriteView, UpdateTitle,
};

const COLUMNS: &str = "id, name, year, description, category_id";

/// Shared SELECT for the read representation. `{filter}` is a WHERE clause
/// over `t` (title) and `c` (category) bound to `$1..$4`.
const DETAIL_SELECT: &str = "
    SELECT t.id, t.name, t.year, t.description,
           c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
           (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS average_score
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id";

const FILTER_WHERE: &str = "
    WHERE ($1::text IS NULL OR c.slug = $1)
      AND ($2::text IS NULL OR EXISTS (
            SELECT 1 FROM genre_title gt
            JOIN genres g ON g.id = gt.genre_id
            WHERE gt.title_id = t.id AND g.slug = $2))
      AND ($3::text IS NULL OR t.name ILIKE $3)
      AND ($4::int IS NULL OR t.year = $4)";

#[derive(Debug, FromRow)]
struct TitleDetailRow {
    id: DbId,
    name: String,
    year: i32,
    description: Option<String>,
    category_id: Option<DbId>,
    category_name: Option<String>,
    category_slug: Option<String>,
    average_score: Option<f64>,
}

#[derive(Debug, FromRow)]
struct TitleGenreRow {
    title_id: DbId,
    id: DbId,
    name: String,
    slug: String,
}

/// Provides CRUD operations for titles.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let title = sqlx::query_as::<_, Title>(&query)
            .bind(&input.name)
            .bind(input.year)
            .bind(&input.description)
            .bind(input.category_id)
            .fetch_one(&mut *tx)
            .await?;

        link_genres(&mut tx, title.id, &input.genre_ids).await?;
        tx.commit().await?;

        Ok(title)
    }

    /// Find a bare title row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM titles WHERE id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a title with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update a title. `None` fields are left untouched; `Some(None)` clears
    /// the description or category; `genre_ids: Some` replaces the full
    /// genre set.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category_id = CASE WHEN $6 THEN $7 ELSE category_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(title) = sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.year)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.category_id.is_some())
            .bind(input.category_id.flatten())
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if let Some(genre_ids) = &input.genre_ids {
            sqlx::query("DELETE FROM genre_title WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(title))
    }

    /// Delete a title. Reviews, comments and genre links cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List titles in read representation, newest year first, then by name.
    pub async fn list_detail(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} {FILTER_WHERE}
             ORDER BY t.year DESC, t.name ASC, t.id ASC
             LIMIT $5 OFFSET $6"
        );
        let rows = sqlx::query_as::<_, TitleDetailRow>(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        attach_genres(pool, rows).await
    }

    /// Count titles matching the same filter as [`TitleRepo::list_detail`].
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t
             LEFT JOIN categories c ON c.id = t.category_id
             {FILTER_WHERE}"
        );
        sqlx::query_scalar(&query)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .fetch_one(pool)
            .await
    }

    /// Fetch one title in read representation.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<TitleDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE t.id = $1");
        let Some(row) = sqlx::query_as::<_, TitleDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(attach_genres(pool, vec![row]).await?.pop())
    }

    /// Fetch one title in write representation (slugs instead of objects).
    pub async fn find_write_view(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TitleWriteView>, sqlx::Error> {
        Ok(Self::find_detail(pool, id).await?.map(|detail| TitleWriteView {
            id: detail.id,
            name: detail.name,
            year: detail.year,
            description: detail.description,
            genre: detail.genre.into_iter().map(|g| g.slug).collect(),
            category: detail.category.map(|c| c.slug),
        }))
    }
}

async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: DbId,
    genre_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if genre_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO genre_title (title_id, genre_id)
         SELECT $1, genre_id FROM UNNEST($2::bigint[]) AS genre_id
         ON CONFLICT ON CONSTRAINT uq_genre_title_pair DO NOTHING",
    )
    .bind(title_id)
    .bind(genre_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Load the genres of every title in `rows` with one query and assemble the
/// read representation, preserving row order.
async fn attach_genres(
    pool: &PgPool,
    rows: Vec<TitleDetailRow>,
) -> Result<Vec<TitleDetail>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
    let genre_rows = sqlx::query_as::<_, TitleGenreRow>(
        "SELECT gt.title_id, g.id, g.name, g.slug
         FROM genre_title gt
         JOIN genres g ON g.id = gt.genre_id
         WHERE gt.title_id = ANY($1)
         ORDER BY g.name",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut genres_by_title: HashMap<DbId, Vec<Genre>> = HashMap::new();
    for row in genre_rows {
        genres_by_title.entry(row.title_id).or_default().push(Genre {
            id: row.id,
            name: row.name,
            slug: row.slug,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let category = match (row.category_id, row.category_name, row.category_slug) {
                (Some(id), Some(name), Some(slug)) => Some(Category { id, name, slug }),
                _ => None,
            };
            TitleDetail {
                id: row.id,
                name: row.name,
                year: row.year,
                rating: rating_from_average(row.average_score),
                description: row.description,
                genre: genres_by_title.remove(&row.id).unwrap_or_default(),
                category,
            }
        })
        .collect())
}
