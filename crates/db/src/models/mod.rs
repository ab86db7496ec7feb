//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - Serializable view structs for API output where the row shape differs
//! - Plain input DTOs for inserts and partial updates (all `Option` fields)

pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;
