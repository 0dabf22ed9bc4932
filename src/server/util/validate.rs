//! Request field validation shared by the services.
//!
//! Every helper returns `AppError::BadRequest` with a message naming the offending field,
//! so services can validate with `?` before touching the database.

use chrono::{DateTime, Utc};

use crate::server::error::AppError;

/// Longest email address accepted at registration.
pub const MAX_EMAIL_LEN: usize = 254;
/// Maximum number of interest tags on a profile.
pub const MAX_INTERESTS: usize = 20;

/// Trims `value` and checks that its length in characters lies within `min..=max`.
pub fn text(field: &str, value: &str, min: usize, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();

    if len < min || len > max {
        return Err(AppError::BadRequest(if min == max {
            format!("{} must be {} characters", field, min)
        } else if min == 0 {
            format!("{} must be at most {} characters", field, max)
        } else {
            format!("{} must be between {} and {} characters", field, min, max)
        }));
    }

    Ok(trimmed.to_string())
}

/// Like [`text`] for optional fields. Blank values become `None`.
pub fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => text(field, v, 1, max).map(Some),
    }
}

/// Checks that an optional capacity-like number is at least 1.
pub fn positive(field: &str, value: Option<i32>) -> Result<Option<i32>, AppError> {
    match value {
        Some(v) if v < 1 => Err(AppError::BadRequest(format!(
            "{} must be at least 1",
            field
        ))),
        other => Ok(other),
    }
}

/// Validates an email address and returns it lowercased.
///
/// The address needs a non-empty local part and domain around a single `@`.
pub fn email(value: &str) -> Result<String, AppError> {
    let email = value.trim().to_lowercase();

    let valid = email.len() <= MAX_EMAIL_LEN
        && match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        };

    if !valid {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    Ok(email)
}

/// Checks password length. Passwords are never trimmed.
pub fn password(value: &str) -> Result<(), AppError> {
    let len = value.chars().count();
    if !(8..=128).contains(&len) {
        return Err(AppError::BadRequest(
            "password must be between 8 and 128 characters".to_string(),
        ));
    }
    Ok(())
}

/// Normalises interest tags: trimmed, lowercase, de-duplicated in first-seen order.
pub fn interests(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let mut normalised: Vec<String> = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || normalised.contains(&tag) {
            continue;
        }
        if tag.contains(',') || tag.chars().count() > 50 {
            return Err(AppError::BadRequest(format!("Invalid interest '{}'", tag)));
        }
        normalised.push(tag);
    }

    if normalised.len() > MAX_INTERESTS {
        return Err(AppError::BadRequest(format!(
            "At most {} interests are allowed",
            MAX_INTERESTS
        )));
    }

    Ok(normalised)
}

/// Checks that `ends_at` is strictly after `starts_at`.
pub fn time_range(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), AppError> {
    if ends_at <= starts_at {
        return Err(AppError::BadRequest(
            "ends_at must be after starts_at".to_string(),
        ));
    }
    Ok(())
}
