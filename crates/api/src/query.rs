//! Shared query parameter types for API handlers.
//!
//! Pagination fields are repeated in each struct rather than flattened:
//! `serde(flatten)` loses the string-to-number coercion of query strings.

use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use yamdb_db::models::title::TitleFilter;

/// Clamped `(limit, offset)` ready for a repository call.
fn window(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
        clamp_offset(offset),
    )
}

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn window(&self) -> (i64, i64) {
        window(self.limit, self.offset)
    }
}

/// `?search=` plus pagination, for users, categories and genres.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    /// The search term, ignoring blank values.
    pub fn term(&self) -> Option<&str> {
        non_blank(&self.search)
    }

    pub fn window(&self) -> (i64, i64) {
        window(self.limit, self.offset)
    }
}

/// Trimmed value of a query parameter, `None` when absent or blank.
fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Filters for `GET /titles`. Blank values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TitleListParams {
    /// Category slug (exact).
    pub category: Option<String>,
    /// Genre slug (exact).
    pub genre: Option<String>,
    /// Case-insensitive substring of the title name.
    pub name: Option<String>,
    /// Release year (exact). Kept as text so `?year=` means "no filter".
    pub year: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TitleListParams {
    /// Build the repository filter, rejecting a non-numeric `year`.
    pub fn filter(&self) -> Result<TitleFilter, CoreError> {
        let year = non_blank(&self.year)
            .map(|y| {
                y.parse::<i32>()
                    .map_err(|_| CoreError::Validation(format!("year: '{y}' is not a number")))
            })
            .transpose()?;

        Ok(TitleFilter {
            category: non_blank(&self.category).map(str::to_owned),
            genre: non_blank(&self.genre).map(str::to_owned),
            name: non_blank(&self.name).map(str::to_owned),
            year,
        })
    }

    pub fn window(&self) -> (i64, i64) {
        window(self.limit, self.offset)
    }
}
