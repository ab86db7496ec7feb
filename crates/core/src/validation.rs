//! Field validation shared by the signup, user and catalog endpoints.
//!
//! Every function returns [`CoreError::Validation`] with a message naming the
//! offending field, which the API layer turns into a 400 response.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_PERSON_NAME_LENGTH: usize = 150;
pub const MAX_NAME_LENGTH: usize = 256;
pub const MAX_SLUG_LENGTH: usize = 50;
pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

/// Path segment reserved for the actor's own user record.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

fn check_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field}: ensure this field has no more than {max} characters"
        )));
    }
    Ok(())
}

fn check_not_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field}: this field may not be blank")));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), CoreError> {
    check_not_blank("username", username)?;
    check_length("username", username, MAX_USERNAME_LENGTH)?;
    if username == RESERVED_USERNAME {
        return Err(CoreError::Validation(format!(
            "username: '{RESERVED_USERNAME}' is reserved"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(
            "username: may contain only letters, digits and @/./+/-/_".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    check_not_blank("email", email)?;
    check_length("email", email, MAX_EMAIL_LENGTH)?;
    if !email.validate_email() {
        return Err(CoreError::Validation("email: enter a valid email address".into()));
    }
    Ok(())
}

/// Validate an optional first/last name.
pub fn validate_person_name(field: &str, value: &str) -> Result<(), CoreError> {
    check_length(field, value, MAX_PERSON_NAME_LENGTH)
}

/// Validate a category, genre or title name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    check_not_blank("name", name)?;
    check_length("name", name, MAX_NAME_LENGTH)
}

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    check_not_blank("slug", slug)?;
    check_length("slug", slug, MAX_SLUG_LENGTH)?;
    if !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(
            "slug: may contain only letters, digits, hyphens and underscores".into(),
        ));
    }
    Ok(())
}

/// A title's year may not lie in the future.
pub fn validate_year(year: i32) -> Result<(), CoreError> {
    let current = chrono::Utc::now().year();
    if year > current {
        return Err(CoreError::Validation(format!(
            "year: {year} is in the future (current year is {current})"
        )));
    }
    Ok(())
}

pub fn validate_score(score: i16) -> Result<(), CoreError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(CoreError::Validation(format!(
            "score: must be between {MIN_SCORE} and {MAX_SCORE}"
        )));
    }
    Ok(())
}

/// Review and comment bodies must not be blank.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    check_not_blank("text", text)
}
