//! Outbound email for notification fan-out.
//!
//! Mail goes through a transactional email HTTP API. Sending is best-effort: callers
//! spawn it after the notification rows are committed and only log failures.

use serde::Serialize;
use url::Url;

use crate::server::{config::EmailConfig, error::AppError};

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Client for the configured email API.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    config: EmailConfig,
    app_url: Url,
}

impl Mailer {
    pub fn new(client: reqwest::Client, config: EmailConfig, app_url: Url) -> Self {
        Self {
            client,
            config,
            app_url,
        }
    }

    /// Sends a single plain-text email.
    ///
    /// `link` is a path relative to the application URL and is appended to the body.
    ///
    /// # Returns
    /// - `Ok(())` - The API accepted the message
    /// - `Err(AppError::ReqwestErr(_))` - Network failure or non-success status
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        link: Option<&str>,
    ) -> Result<(), AppError> {
        let request = EmailRequest {
            from: &self.config.from,
            to,
            subject,
            text: self.compose(body, link),
        };

        self.client
            .post(self.config.api_url.clone())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    fn compose(&self, body: &str, link: Option<&str>) -> String {
        match link.and_then(|path| self.app_url.join(path.trim_start_matches('/')).ok()) {
            Some(url) => format!("{body}\n\n{url}"),
            None => body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> Mailer {
        Mailer::new(
            reqwest::Client::new(),
            EmailConfig {
                api_url: Url::parse("https://mail.example/send").unwrap(),
                api_key: "key".to_string(),
                from: "hub@uni.example".to_string(),
            },
            Url::parse("https://hub.uni.example/").unwrap(),
        )
    }

    #[test]
    fn appends_absolute_link_to_body() {
        let text = mailer().compose("Approved", Some("/hubs/4"));

        assert_eq!(text, "Approved\n\nhttps://hub.uni.example/hubs/4");
    }

    #[test]
    fn leaves_body_alone_without_link() {
        assert_eq!(mailer().compose("Hello", None), "Hello");
    }
}
