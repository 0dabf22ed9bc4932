//! One-time bootstrap code for claiming the first admin account.
//!
//! When no admin exists at startup a code is generated and written to the log. A
//! logged-in user who submits it within the TTL is promoted. The code is held in memory
//! only and is consumed by the first successful claim.

use rand::Rng;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

const CODE_TTL: Duration = Duration::from_secs(60);
const CODE_LENGTH: usize = 32;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Clone)]
struct IssuedCode {
    value: String,
    expires_at: Instant,
}

/// Holds at most one outstanding admin claim code.
#[derive(Clone, Default)]
pub struct AdminCodeService {
    current: Arc<RwLock<Option<IssuedCode>>>,
}

impl AdminCodeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh code, replacing any outstanding one.
    pub async fn generate(&self) -> String {
        let value = random_code();

        *self.current.write().await = Some(IssuedCode {
            value: value.clone(),
            expires_at: Instant::now() + CODE_TTL,
        });

        value
    }

    /// Checks `input` against the outstanding code and consumes it on a match.
    ///
    /// An expired code is discarded on the first check after expiry.
    ///
    /// # Returns
    /// - `true` - Code matched and was still valid
    /// - `false` - No code, wrong code, or expired
    pub async fn validate_and_consume(&self, input: &str) -> bool {
        let mut current = self.current.write().await;

        let Some(issued) = current.as_ref() else {
            return false;
        };

        if Instant::now() >= issued.expires_at {
            *current = None;
            return false;
        }

        if issued.value == input {
            *current = None;
            return true;
        }

        false
    }

    #[cfg(test)]
    async fn expire_now(&self) {
        if let Some(issued) = self.current.write().await.as_mut() {
            issued.expires_at = Instant::now();
        }
    }
}

fn random_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generated_code_is_alphanumeric() {
        let service = AdminCodeService::new();
        let code = service.generate().await;

        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn code_is_single_use() {
        let service = AdminCodeService::new();
        let code = service.generate().await;

        assert!(service.validate_and_consume(&code).await);
        assert!(!service.validate_and_consume(&code).await);
    }

    #[tokio::test]
    async fn wrong_code_keeps_the_real_one_valid() {
        let service = AdminCodeService::new();
        let code = service.generate().await;

        assert!(!service.validate_and_consume("not-the-code").await);
        assert!(service.validate_and_consume(&code).await);
    }

    #[tokio::test]
    async fn nothing_to_validate_without_a_code() {
        let service = AdminCodeService::new();
        assert!(!service.validate_and_consume("anything").await);
    }

    #[tokio::test]
    async fn regenerating_replaces_the_old_code() {
        let service = AdminCodeService::new();
        let old = service.generate().await;
        let new = service.generate().await;

        assert_ne!(old, new);
        assert!(!service.validate_and_consume(&old).await);
        assert!(service.validate_and_consume(&new).await);
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let service = AdminCodeService::new();
        let code = service.generate().await;
        service.expire_now().await;

        assert!(!service.validate_and_consume(&code).await);
    }
}
