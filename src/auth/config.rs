//! Capability configuration for the external auth service.
//!
//! `AuthConfig` lists what the auth service is expected to support: whether
//! email/password sign-in is enabled, which social providers are wired, and
//! which extra user fields it attaches (with their defaults). It is built once
//! at startup and shared read-only; request handlers never branch on it apart
//! from the sign-in page, which lists the enabled methods.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Role assigned to users whose record carries no role.
pub const DEFAULT_ROLE: &str = "student";

/// Name of the additional user field holding the role.
pub const ROLE_FIELD: &str = "role";

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid auth service URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("social provider {0} is missing its client id")]
    MissingClientId(String),
    #[error("social provider {0} is missing its client secret")]
    MissingClientSecret(String),
    #[error("default value for field {field} is not a {expected}")]
    DefaultTypeMismatch { field: String, expected: FieldType },
}

/// Email/password sign-in switch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmailAndPassword {
    pub enabled: bool,
}

/// OAuth client credentials for one social provider.
#[derive(Clone, Debug)]
pub struct SocialProvider {
    pub client_id: String,
    pub client_secret: SecretString,
}

impl SocialProvider {
    #[must_use]
    pub fn new(client_id: String, client_secret: SecretString) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }
}

/// Value type of an additional user field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
}

impl FieldType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Extra field the auth service attaches to every user record.
#[derive(Clone, Debug, PartialEq)]
pub struct AdditionalField {
    pub field_type: FieldType,
    pub required: bool,
    pub default_value: Option<Value>,
}

impl AdditionalField {
    #[must_use]
    pub fn string(required: bool, default_value: Option<&str>) -> Self {
        Self {
            field_type: FieldType::String,
            required,
            default_value: default_value.map(|value| Value::String(value.to_string())),
        }
    }
}

/// Why a user record could not be completed from the configured fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("required field {0} is missing")]
    Missing(String),
    #[error("field {field} is not a {expected}")]
    WrongType { field: String, expected: FieldType },
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    auth_url: Url,
    home_url: String,
    request_timeout: Duration,
    email_and_password: EmailAndPassword,
    social_providers: BTreeMap<String, SocialProvider>,
    additional_fields: BTreeMap<String, AdditionalField>,
}

impl AuthConfig {
    /// Build a configuration pointing at the auth service base URL.
    ///
    /// Email/password sign-in starts enabled and the `role` field defaults to
    /// [`DEFAULT_ROLE`].
    ///
    /// # Errors
    /// Returns an error if the URL is not an absolute `http(s)` URL.
    pub fn new(auth_url: &str) -> Result<Self, ConfigError> {
        let auth_url = parse_base_url(auth_url)?;

        let mut additional_fields = BTreeMap::new();
        additional_fields.insert(
            ROLE_FIELD.to_string(),
            AdditionalField::string(true, Some(DEFAULT_ROLE)),
        );

        Ok(Self {
            auth_url,
            home_url: "/".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
            email_and_password: EmailAndPassword { enabled: true },
            social_providers: BTreeMap::new(),
            additional_fields,
        })
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_home_url(mut self, home_url: String) -> Self {
        self.home_url = home_url;
        self
    }

    #[must_use]
    pub fn with_email_and_password(mut self, enabled: bool) -> Self {
        self.email_and_password = EmailAndPassword { enabled };
        self
    }

    #[must_use]
    pub fn with_social_provider(mut self, name: &str, provider: SocialProvider) -> Self {
        self.social_providers.insert(name.to_lowercase(), provider);
        self
    }

    #[must_use]
    pub fn with_additional_field(mut self, name: &str, field: AdditionalField) -> Self {
        self.additional_fields.insert(name.to_string(), field);
        self
    }

    /// Check that every declared option is usable.
    ///
    /// # Errors
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, provider) in &self.social_providers {
            if provider.client_id.trim().is_empty() {
                return Err(ConfigError::MissingClientId(name.clone()));
            }
            if provider.client_secret.expose_secret().trim().is_empty() {
                return Err(ConfigError::MissingClientSecret(name.clone()));
            }
        }
        for (name, field) in &self.additional_fields {
            if let Some(default) = &field.default_value {
                if !field.field_type.accepts(default) {
                    return Err(ConfigError::DefaultTypeMismatch {
                        field: name.clone(),
                        expected: field.field_type,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    #[must_use]
    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn email_and_password(&self) -> EmailAndPassword {
        self.email_and_password
    }

    #[must_use]
    pub fn social_provider(&self, name: &str) -> Option<&SocialProvider> {
        self.social_providers.get(&name.to_lowercase())
    }

    /// Names of the configured social providers, sorted.
    pub fn social_provider_names(&self) -> impl Iterator<Item = &str> {
        self.social_providers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn additional_fields(&self) -> &BTreeMap<String, AdditionalField> {
        &self.additional_fields
    }

    /// Complete the additional fields of a user record.
    ///
    /// Present values are type-checked, absent or null ones take their
    /// default. A required field with neither is an error.
    ///
    /// # Errors
    /// Returns [`FieldError`] when the record cannot be completed.
    pub fn resolve_fields(
        &self,
        record: &Map<String, Value>,
    ) -> Result<BTreeMap<String, Value>, FieldError> {
        let mut resolved = BTreeMap::new();
        for (name, field) in &self.additional_fields {
            match record.get(name).filter(|value| !value.is_null()) {
                Some(value) if field.field_type.accepts(value) => {
                    resolved.insert(name.clone(), value.clone());
                }
                Some(_) => {
                    return Err(FieldError::WrongType {
                        field: name.clone(),
                        expected: field.field_type,
                    });
                }
                None => match &field.default_value {
                    Some(default) => {
                        resolved.insert(name.clone(), default.clone());
                    }
                    None if field.required => return Err(FieldError::Missing(name.clone())),
                    None => {}
                },
            }
        }
        Ok(resolved)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }

    // Endpoints are joined as relative paths, so the base must end with '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn new_normalizes_base_url() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://auth.local:3000")?;
        assert_eq!(config.auth_url().as_str(), "http://auth.local:3000/");

        let config = AuthConfig::new("https://example.com/auth?x=1")?;
        assert_eq!(config.auth_url().as_str(), "https://example.com/auth/");
        Ok(())
    }

    #[test]
    fn new_rejects_non_http_urls() {
        assert!(AuthConfig::new("ftp://example.com").is_err());
        assert!(AuthConfig::new("not a url").is_err());
    }

    #[test]
    fn defaults_enable_email_and_role_field() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?;
        assert!(config.email_and_password().enabled);
        assert_eq!(config.social_provider_names().count(), 0);
        assert_eq!(
            config.additional_fields().get(ROLE_FIELD),
            Some(&AdditionalField::string(true, Some(DEFAULT_ROLE)))
        );
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        Ok(())
    }

    #[test]
    fn resolve_fields_applies_default_role() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?;
        let resolved = config.resolve_fields(&record(json!({})));
        assert_eq!(
            resolved.ok().and_then(|fields| fields.get(ROLE_FIELD).cloned()),
            Some(json!("student"))
        );

        let resolved = config.resolve_fields(&record(json!({ "role": null })));
        assert_eq!(
            resolved.ok().and_then(|fields| fields.get(ROLE_FIELD).cloned()),
            Some(json!("student"))
        );
        Ok(())
    }

    #[test]
    fn resolve_fields_keeps_present_values() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?;
        let resolved = config.resolve_fields(&record(json!({ "role": "instructor" })));
        assert_eq!(
            resolved.ok().and_then(|fields| fields.get(ROLE_FIELD).cloned()),
            Some(json!("instructor"))
        );
        Ok(())
    }

    #[test]
    fn resolve_fields_rejects_missing_required_without_default() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?
            .with_additional_field("cohort", AdditionalField::string(true, None));
        assert_eq!(
            config.resolve_fields(&record(json!({ "role": "student" }))),
            Err(FieldError::Missing("cohort".to_string()))
        );
        Ok(())
    }

    #[test]
    fn resolve_fields_skips_optional_without_default() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?
            .with_additional_field("cohort", AdditionalField::string(false, None));
        let resolved = config.resolve_fields(&record(json!({})));
        assert!(resolved.is_ok_and(|fields| !fields.contains_key("cohort")));
        Ok(())
    }

    #[test]
    fn resolve_fields_rejects_wrong_type() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?;
        assert_eq!(
            config.resolve_fields(&record(json!({ "role": 7 }))),
            Err(FieldError::WrongType {
                field: ROLE_FIELD.to_string(),
                expected: FieldType::String,
            })
        );
        Ok(())
    }

    #[test]
    fn validate_requires_social_credentials() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?.with_social_provider(
            "Google",
            SocialProvider::new(String::new(), SecretString::from("secret".to_string())),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingClientId("google".to_string()))
        );

        let config = AuthConfig::new("http://localhost:3000")?.with_social_provider(
            "google",
            SocialProvider::new("client-id".to_string(), SecretString::from("".to_string())),
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingClientSecret("google".to_string()))
        );
        Ok(())
    }

    #[test]
    fn validate_checks_default_types() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?.with_additional_field(
            "verified",
            AdditionalField {
                field_type: FieldType::Boolean,
                required: false,
                default_value: Some(json!("yes")),
            },
        );
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefaultTypeMismatch {
                field: "verified".to_string(),
                expected: FieldType::Boolean,
            })
        );
        Ok(())
    }

    #[test]
    fn social_provider_names_are_lowercase_and_sorted() -> Result<(), ConfigError> {
        let config = AuthConfig::new("http://localhost:3000")?
            .with_social_provider(
                "GitHub",
                SocialProvider::new("gh".to_string(), SecretString::from("s".to_string())),
            )
            .with_social_provider(
                "Google",
                SocialProvider::new("g".to_string(), SecretString::from("s".to_string())),
            );
        let names: Vec<&str> = config.social_provider_names().collect();
        assert_eq!(names, vec!["github", "google"]);
        assert!(config.social_provider("google").is_some());
        assert!(config.validate().is_ok());
        Ok(())
    }
}
