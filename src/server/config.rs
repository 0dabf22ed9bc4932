use std::net::SocketAddr;

use url::Url;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o-mini";

/// Chat-completion API settings used by the insight generator.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub api_url: Url,
    pub api_key: String,
    pub model: String,
}

/// Transactional email API settings used for notification fan-out.
#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub api_url: Url,
    pub api_key: String,
    pub from: String,
}

pub struct Config {
    pub database_url: String,
    pub app_url: Url,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
    pub session_secure: bool,

    pub completion: Option<CompletionConfig>,
    pub email: Option<EmailConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let app_url = parse_url("APP_URL", &required("APP_URL")?)?;

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| invalid("BIND_ADDR", e))?;

        let cors_origin = optional("CORS_ORIGIN")
            .unwrap_or_else(|| app_url.origin().ascii_serialization());

        let session_secure = match optional("SESSION_SECURE") {
            Some(value) => value
                .parse::<bool>()
                .map_err(|e| invalid("SESSION_SECURE", e))?,
            None => false,
        };

        let completion = match optional("COMPLETION_API_URL") {
            Some(api_url) => Some(CompletionConfig {
                api_url: parse_url("COMPLETION_API_URL", &api_url)?,
                api_key: required("COMPLETION_API_KEY")?,
                model: optional("COMPLETION_MODEL")
                    .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            }),
            None => None,
        };

        let email = match optional("EMAIL_API_URL") {
            Some(api_url) => Some(EmailConfig {
                api_url: parse_url("EMAIL_API_URL", &api_url)?,
                api_key: required("EMAIL_API_KEY")?,
                from: required("EMAIL_FROM")?,
            }),
            None => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            app_url,
            bind_addr,
            cors_origin,
            session_secure,
            completion,
            email,
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_url(name: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| invalid(name, e))
}

fn invalid(name: &str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
