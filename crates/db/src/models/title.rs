//! Title entity model, read/write views and DTOs.
//!
//! Titles have two external representations:
//! - [`TitleDetail`] for reads: nested category and genres, derived rating.
//! - [`TitleWriteView`] for writes: category and genres as slugs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

use crate::models::category::Category;
use crate::models::genre::Genre;

/// A row from the `titles` table.
#[derive(Debug, Clone, FromRow)]
pub struct Title {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
}

/// Read representation returned by `GET /titles` and `GET /titles/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct TitleDetail {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    /// Truncated mean of review scores; `null` without reviews.
    pub rating: Option<i32>,
    pub description: Option<String>,
    pub genre: Vec<Genre>,
    pub category: Option<Category>,
}

/// Write representation returned by `POST` and `PATCH`.
#[derive(Debug, Clone, Serialize)]
pub struct TitleWriteView {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// DTO for inserting a title with its genre links.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// DTO for a partial title update. `genre_ids: Some(..)` replaces all links.
///
/// `description` and `category_id` are double options: the outer `None` keeps
/// the stored value, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<DbId>>,
    pub genre_ids: Option<Vec<DbId>>,
}

/// Optional list filters for `GET /titles`.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Category slug, exact match.
    pub category: Option<String>,
    /// Genre slug, exact match.
    pub genre: Option<String>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub year: Option<i32>,
}
