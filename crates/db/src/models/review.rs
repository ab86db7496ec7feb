//! Review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A review joined with its author's username.
///
/// Serialized as `{id, text, author, score, pub_date}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub score: i16,
    pub pub_date: Timestamp,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
}

/// DTO for creating a review. Author and title come from the request context.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub text: String,
    pub score: i16,
    pub author_id: DbId,
    pub title_id: DbId,
}

/// DTO for updating a review. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i16>,
}
