use std::str::FromStr;

use crate::server::error::{internal::InternalError, AppError};

/// Parses an enum-like value read back from a database column.
///
/// Stored roles, statuses and kinds are written by the application itself, so a value that
/// fails to parse indicates corrupted data rather than bad input.
///
/// # Arguments
/// - `field` - Table and column name, used in the error message
/// - `value` - The stored string
///
/// # Returns
/// - `Ok(T)` - Successfully parsed value
/// - `Err(AppError::InternalErr(InvalidStoredValue))` - Value is not recognised
pub fn parse_stored<T: FromStr>(field: &'static str, value: String) -> Result<T, AppError> {
    value
        .parse::<T>()
        .map_err(|_| InternalError::InvalidStoredValue { field, value }.into())
}

/// Parses an enum-like value supplied in a request body.
///
/// # Returns
/// - `Ok(T)` - Successfully parsed value
/// - `Err(AppError::BadRequest)` - Value is not one of the accepted options
pub fn parse_input<T: FromStr>(field: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::BadRequest(format!("Invalid {}: '{}'", field, value)))
}

/// Splits the comma-separated interests column into tags.
pub fn split_interests(stored: &str) -> Vec<String> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins interest tags for storage in the interests column.
pub fn join_interests(tags: &[String]) -> String {
    tags.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::hub::HubRole;

    #[test]
    fn parses_known_stored_value() {
        let role: HubRole = parse_stored("hub_member.role", "admin".to_string()).unwrap();
        assert_eq!(role, HubRole::Admin);
    }

    #[test]
    fn rejects_unknown_stored_value() {
        let result: Result<HubRole, _> = parse_stored("hub_member.role", "king".to_string());
        assert!(matches!(
            result,
            Err(AppError::InternalErr(InternalError::InvalidStoredValue { .. }))
        ));
    }

    #[test]
    fn rejects_unknown_input_as_bad_request() {
        let result: Result<HubRole, _> = parse_input("role", "king");
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn interests_round_trip_through_column() {
        let tags = split_interests("robotics, ai,,music");
        assert_eq!(tags, vec!["robotics", "ai", "music"]);
        assert_eq!(join_interests(&tags), "robotics,ai,music");
        assert!(split_interests("").is_empty());
    }
}
