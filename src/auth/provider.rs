//! The seam between request handlers and the external auth service.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

use super::session::Session;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("auth service request timed out")]
    Timeout,
    #[error("auth service unreachable: {0}")]
    Unreachable(String),
    #[error("auth service answered with status {0}")]
    Status(u16),
    #[error("auth service rejected the credentials")]
    Rejected,
    #[error("malformed auth service response: {0}")]
    Malformed(String),
    #[error("incomplete user record: {0}")]
    Incomplete(String),
    #[error("auth service misconfigured: {0}")]
    Misconfigured(String),
}

impl ProviderError {
    /// True when no request could be formed at all (misconfiguration).
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Misconfigured(_))
    }
}

/// Cookies the auth service wants set on the browser.
#[derive(Clone, Debug, Default)]
pub struct ProviderReply {
    pub cookies: Vec<HeaderValue>,
}

/// Where to send the browser to continue a social sign-in.
#[derive(Clone, Debug)]
pub struct SocialRedirect {
    /// Authorization URL, already checked to be a usable `Location`.
    pub location: HeaderValue,
    pub cookies: Vec<HeaderValue>,
}

#[derive(Debug)]
pub struct EmailCredentials {
    pub email: String,
    pub password: SecretString,
}

pub type SharedProvider = Arc<dyn SessionProvider>;

/// Session operations delegated to the auth service.
///
/// `headers` are the incoming request's headers; implementations forward the
/// ones identifying the caller (cookies, bearer token, origin).
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Look up the caller's current session.
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, ProviderError>;

    /// Terminate the caller's current session.
    async fn sign_out(&self, headers: &HeaderMap) -> Result<ProviderReply, ProviderError>;

    async fn sign_in_email(
        &self,
        headers: &HeaderMap,
        credentials: &EmailCredentials,
    ) -> Result<ProviderReply, ProviderError>;

    async fn sign_in_social(
        &self,
        headers: &HeaderMap,
        provider: &str,
        callback_url: &str,
    ) -> Result<SocialRedirect, ProviderError>;

    /// Liveness check used by `/health`.
    async fn ping(&self) -> Result<(), ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::ProviderError;

    #[test]
    fn only_misconfiguration_is_fatal() {
        assert!(ProviderError::Misconfigured("bad url".to_string()).is_fatal());
        assert!(!ProviderError::Timeout.is_fatal());
        assert!(!ProviderError::Unreachable("refused".to_string()).is_fatal());
        assert!(!ProviderError::Status(500).is_fatal());
        assert!(!ProviderError::Malformed("eof".to_string()).is_fatal());
        assert!(!ProviderError::Incomplete("email".to_string()).is_fatal());
        assert!(!ProviderError::Rejected.is_fatal());
    }
}
