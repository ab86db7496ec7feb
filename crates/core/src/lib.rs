//! Domain types and pure logic shared by the database and API layers.
//!
//! Nothing in this crate performs I/O.

pub mod confirmation;
pub mod error;
pub mod hashing;
pub mod pagination;
pub mod permissions;
pub mod rating;
pub mod roles;
pub mod types;
pub mod validation;
