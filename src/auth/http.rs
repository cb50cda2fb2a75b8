//! better-auth compatible HTTP adapter for [`SessionProvider`].

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE};
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode, redirect::Policy};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};
use url::Url;

use super::config::AuthConfig;
use super::provider::{
    EmailCredentials, ProviderError, ProviderReply, SessionProvider, SocialRedirect,
};
use super::session::{Session, decode_session};
use crate::APP_USER_AGENT;

const GET_SESSION_PATH: &str = "api/auth/get-session";
const SIGN_OUT_PATH: &str = "api/auth/sign-out";
const SIGN_IN_EMAIL_PATH: &str = "api/auth/sign-in/email";
const SIGN_IN_SOCIAL_PATH: &str = "api/auth/sign-in/social";
const OK_PATH: &str = "api/auth/ok";

// Headers that identify the caller to the auth service.
const FORWARDED_HEADERS: &[&str] = &["cookie", "authorization", "origin", "x-forwarded-for"];

#[derive(Debug, Deserialize)]
struct SocialSignInResponse {
    url: Option<String>,
}

#[derive(Debug)]
pub struct HttpSessionProvider {
    client: Client,
    config: Arc<AuthConfig>,
}

impl HttpSessionProvider {
    /// Build the adapter; every request it sends is bounded by
    /// [`AuthConfig::request_timeout`].
    ///
    /// # Errors
    /// Returns [`ProviderError::Misconfigured`] if the HTTP client cannot be built.
    pub fn new(config: Arc<AuthConfig>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.request_timeout())
            .redirect(Policy::none())
            .build()
            .map_err(|e| {
                ProviderError::Misconfigured(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        self.config
            .auth_url()
            .join(path)
            .map_err(|e| ProviderError::Misconfigured(format!("invalid endpoint {path}: {e}")))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        headers: &HeaderMap,
        operation: &'static str,
    ) -> Result<Response, ProviderError> {
        let mut request = request;
        for name in FORWARDED_HEADERS {
            for value in headers.get_all(*name) {
                request = request.header(*name, value.clone());
            }
        }

        let span = info_span!("auth.request", auth.operation = operation);
        let response = request.send().instrument(span).await.map_err(request_error)?;

        debug!("auth service {} answered {}", operation, response.status());

        Ok(response)
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn get_session(&self, headers: &HeaderMap) -> Result<Option<Session>, ProviderError> {
        let url = self.endpoint(GET_SESSION_PATH)?;
        let response = self.send(self.client.get(url), headers, "get-session").await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(request_error)?;
        decode_session(&body, &self.config, Utc::now())
    }

    async fn sign_out(&self, headers: &HeaderMap) -> Result<ProviderReply, ProviderError> {
        let url = self.endpoint(SIGN_OUT_PATH)?;
        let request = self.client.post(url).json(&json!({}));
        let response = self.send(request, headers, "sign-out").await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        Ok(ProviderReply {
            cookies: set_cookies(&response),
        })
    }

    async fn sign_in_email(
        &self,
        headers: &HeaderMap,
        credentials: &EmailCredentials,
    ) -> Result<ProviderReply, ProviderError> {
        let url = self.endpoint(SIGN_IN_EMAIL_PATH)?;
        let request = self.client.post(url).json(&json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
            "callbackURL": self.config.home_url(),
        }));
        let response = self.send(request, headers, "sign-in-email").await?;

        match response.status() {
            status if status.is_success() => Ok(ProviderReply {
                cookies: set_cookies(&response),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Rejected),
            status => Err(ProviderError::Status(status.as_u16())),
        }
    }

    async fn sign_in_social(
        &self,
        headers: &HeaderMap,
        provider: &str,
        callback_url: &str,
    ) -> Result<SocialRedirect, ProviderError> {
        let url = self.endpoint(SIGN_IN_SOCIAL_PATH)?;
        let request = self.client.post(url).json(&json!({
            "provider": provider,
            "callbackURL": callback_url,
        }));
        let response = self.send(request, headers, "sign-in-social").await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let cookies = set_cookies(&response);
        let body: SocialSignInResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let url = body
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ProviderError::Malformed("missing authorization url".to_string()))?;

        Ok(SocialRedirect {
            location: authorization_location(&url)?,
            cookies,
        })
    }

    async fn ping(&self) -> Result<(), ProviderError> {
        let url = self.endpoint(OK_PATH)?;
        let response = self
            .send(self.client.get(url), &HeaderMap::new(), "ok")
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProviderError::Status(status.as_u16()))
        }
    }
}

fn request_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_builder() {
        ProviderError::Misconfigured(err.to_string())
    } else {
        ProviderError::Unreachable(err.to_string())
    }
}

// The URL becomes a `Location` header: only absolute http(s) URLs that are
// valid header values as received.
fn authorization_location(url: &str) -> Result<HeaderValue, ProviderError> {
    let parsed = Url::parse(url)
        .map_err(|e| ProviderError::Malformed(format!("invalid authorization url: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ProviderError::Malformed(format!(
            "unsupported authorization url scheme: {}",
            parsed.scheme()
        )));
    }

    HeaderValue::from_str(url).map_err(|e| {
        ProviderError::Malformed(format!("authorization url is not a valid header: {e}"))
    })
}

fn set_cookies(response: &Response) -> Vec<HeaderValue> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .cloned()
        .collect()
}
