//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the current user from a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but anonymous requests are allowed.
//! - [`rbac::RequireAdmin`] -- Requires an administrator.

pub mod auth;
pub mod rbac;
