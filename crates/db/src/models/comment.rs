//! Comment entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    /// Author username.
    pub author: String,
    pub pub_date: Timestamp,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    #[serde(skip_serializing)]
    pub review_id: DbId,
}

/// DTO for creating a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub text: String,
    pub author_id: DbId,
    pub review_id: DbId,
}

/// DTO for updating a comment.
#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub text: Option<String>,
}
