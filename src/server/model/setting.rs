//! Platform settings with typed values and built-in defaults.

use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

use crate::{model::admin::SettingDto, server::error::AppError};

/// Settings an administrator can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Whether self-service registration is allowed.
    RegistrationOpen,
    /// How many hubs a non-admin user may own.
    MaxHubsPerUser,
    /// How many pending join requests a user may have open at once.
    MaxPendingRequestsPerUser,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        Self::RegistrationOpen,
        Self::MaxHubsPerUser,
        Self::MaxPendingRequestsPerUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegistrationOpen => "registration_open",
            Self::MaxHubsPerUser => "max_hubs_per_user",
            Self::MaxPendingRequestsPerUser => "max_pending_requests_per_user",
        }
    }

    pub fn default_value(&self) -> SettingValue {
        match self {
            Self::RegistrationOpen => SettingValue::Bool(true),
            Self::MaxHubsPerUser => SettingValue::Int(5),
            Self::MaxPendingRequestsPerUser => SettingValue::Int(10),
        }
    }

    /// Validates a JSON value supplied by an administrator for this key.
    ///
    /// # Returns
    /// - `Ok(SettingValue)` - Value has the key's type and is in range
    /// - `Err(AppError::BadRequest)` - Wrong type or out of range
    pub fn parse_json(&self, value: &serde_json::Value) -> Result<SettingValue, AppError> {
        match self {
            Self::RegistrationOpen => value.as_bool().map(SettingValue::Bool).ok_or_else(|| {
                AppError::BadRequest(format!("{} must be a boolean", self.as_str()))
            }),
            Self::MaxHubsPerUser => int_at_least(self, value, 0),
            Self::MaxPendingRequestsPerUser => int_at_least(self, value, 1),
        }
    }

    /// Parses a stored value. Returns `None` when the stored string does not fit the key's
    /// type, in which case callers fall back to the default.
    pub fn parse_stored(&self, value: &str) -> Option<SettingValue> {
        match self.default_value() {
            SettingValue::Bool(_) => value.parse::<bool>().ok().map(SettingValue::Bool),
            SettingValue::Int(_) => value.parse::<i64>().ok().map(SettingValue::Int),
        }
    }
}

fn int_at_least(
    key: &SettingKey,
    value: &serde_json::Value,
    min: i64,
) -> Result<SettingValue, AppError> {
    match value.as_i64() {
        Some(v) if v >= min => Ok(SettingValue::Int(v)),
        _ => Err(AppError::BadRequest(format!(
            "{} must be an integer of at least {}",
            key.as_str(),
            min
        ))),
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
        }
    }

    /// String written to the `setting.value` column.
    pub fn to_stored(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
        }
    }
}

/// A setting with its effective value.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub key: SettingKey,
    pub value: SettingValue,
    /// Whether no override is stored and the default applies.
    pub is_default: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Setting {
    /// Resolves the effective setting from an optional stored row.
    pub fn resolve(key: SettingKey, stored: Option<entity::setting::Model>) -> Self {
        match stored.and_then(|row| key.parse_stored(&row.value).map(|v| (v, row.updated_at))) {
            Some((value, updated_at)) => Self {
                key,
                value,
                is_default: false,
                updated_at: Some(updated_at),
            },
            None => Self {
                key,
                value: key.default_value(),
                is_default: true,
                updated_at: None,
            },
        }
    }

    pub fn into_dto(self) -> SettingDto {
        SettingDto {
            key: self.key.to_string(),
            value: self.value.to_json(),
            is_default: self.is_default,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_key_does_not_parse() {
        assert_eq!(
            "max_hubs_per_user".parse::<SettingKey>(),
            Ok(SettingKey::MaxHubsPerUser)
        );
        assert!("theme".parse::<SettingKey>().is_err());
    }

    #[test]
    fn json_values_are_type_checked() {
        assert_eq!(
            SettingKey::RegistrationOpen.parse_json(&json!(false)).unwrap(),
            SettingValue::Bool(false)
        );
        assert!(SettingKey::RegistrationOpen.parse_json(&json!("no")).is_err());
        assert!(SettingKey::MaxHubsPerUser.parse_json(&json!(-1)).is_err());
        assert!(SettingKey::MaxHubsPerUser.parse_json(&json!(0)).is_ok());
        assert!(SettingKey::MaxPendingRequestsPerUser
            .parse_json(&json!(0))
            .is_err());
        assert!(SettingKey::MaxPendingRequestsPerUser
            .parse_json(&json!(2.5))
            .is_err());
    }

    #[test]
    fn unreadable_stored_value_falls_back_to_default() {
        let row = entity::setting::Model {
            key: "max_hubs_per_user".to_string(),
            value: "lots".to_string(),
            updated_by: None,
            updated_at: Utc::now(),
        };
        let setting = Setting::resolve(SettingKey::MaxHubsPerUser, Some(row));
        assert!(setting.is_default);
        assert_eq!(setting.value, SettingValue::Int(5));
    }
}
