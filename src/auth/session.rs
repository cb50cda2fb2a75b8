//! Session model and decoding of the auth service's session payload.
//!
//! The auth service answers a lookup with `{ "session": {..}, "user": {..} }`
//! or `null`. A payload is either turned into a complete [`Session`] or
//! rejected; callers never see a partially populated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::{AuthConfig, DEFAULT_ROLE, ROLE_FIELD};
use super::provider::ProviderError;

/// Authenticated user as seen by this front-end.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
}

/// Active login returned by the auth service.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user: User,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    #[serde(default)]
    session: Option<SessionMeta>,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionMeta {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Option<String>,
    name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Decode a session lookup body.
///
/// `null` or an empty body mean "no session". An expired session is also
/// reported as `None`.
///
/// # Errors
/// Returns [`ProviderError::Malformed`] for undecodable JSON and
/// [`ProviderError::Incomplete`] when a required user field is missing.
pub fn decode_session(
    body: &[u8],
    config: &AuthConfig,
    now: DateTime<Utc>,
) -> Result<Option<Session>, ProviderError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let payload: Option<SessionPayload> =
        serde_json::from_slice(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let Some(payload) = payload else {
        return Ok(None);
    };

    let session = Session {
        user: complete_user(payload.user, config)?,
        expires_at: payload.session.and_then(|meta| meta.expires_at),
    };

    if session.is_expired(now) {
        return Ok(None);
    }

    Ok(Some(session))
}

fn complete_user(payload: UserPayload, config: &AuthConfig) -> Result<User, ProviderError> {
    let id = required(payload.id, "id")?;
    let email = required(payload.email, "email")?;
    // better-auth always sends a name, but it may legitimately be empty.
    let name = payload
        .name
        .ok_or_else(|| ProviderError::Incomplete("name".to_string()))?;

    let fields = config
        .resolve_fields(&payload.extra)
        .map_err(|e| ProviderError::Incomplete(e.to_string()))?;

    let role = fields
        .get(ROLE_FIELD)
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ROLE)
        .to_string();

    Ok(User {
        id,
        name,
        email,
        image: payload
            .image
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty()),
        role,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, ProviderError> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ProviderError::Incomplete(field.to_string()))
}
