use crate::{
    auth::{
        AdditionalField, AuthConfig, HttpSessionProvider, ROLE_FIELD, SharedProvider,
        SocialProvider,
    },
    sessiongate::{self, views::Views},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub auth_url: String,
    pub public_url: String,
    pub auth_timeout: Duration,
    pub email_password: bool,
    pub default_role: String,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<SecretString>,
}

/// Build the capability configuration from the command line.
///
/// # Errors
/// Returns an error if the auth URL is invalid or a declared option is unusable.
pub fn auth_config(args: &Args) -> Result<AuthConfig> {
    let mut config = AuthConfig::new(&args.auth_url)
        .context("invalid SESSIONGATE_AUTH_URL")?
        .with_request_timeout(args.auth_timeout)
        .with_home_url(args.public_url.clone())
        .with_email_and_password(args.email_password)
        .with_additional_field(
            ROLE_FIELD,
            AdditionalField::string(true, Some(args.default_role.as_str())),
        );

    if let (Some(client_id), Some(client_secret)) =
        (&args.google_client_id, &args.google_client_secret)
    {
        config = config.with_social_provider(
            "google",
            SocialProvider::new(client_id.clone(), client_secret.clone()),
        );
    }

    config.validate()?;

    Ok(config)
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = Arc::new(auth_config(&args)?);

    log_startup_args(&args, &config);

    let provider: SharedProvider = Arc::new(
        HttpSessionProvider::new(Arc::clone(&config))
            .context("Failed to build auth service client")?,
    );

    let views = Arc::new(Views::new().context("Failed to load views")?);

    sessiongate::new(args.port, provider, config, views).await
}

fn log_startup_args(args: &Args, config: &AuthConfig) {
    let providers: Vec<&str> = config.social_provider_names().collect();
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("auth_url", config.auth_url().to_string()),
        ("auth_timeout", format!("{}s", args.auth_timeout.as_secs())),
        ("public_url", args.public_url.clone()),
        ("email_password", args.email_password.to_string()),
        (
            "social_providers",
            if providers.is_empty() {
                "none".to_string()
            } else {
                providers.join(",")
            },
        ),
        ("default_role", args.default_role.clone()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DEFAULT_ROLE;

    fn args() -> Args {
        Args {
            port: 8080,
            auth_url: "http://auth.test".to_string(),
            public_url: "http://localhost:8080/".to_string(),
            auth_timeout: Duration::from_secs(5),
            email_password: true,
            default_role: DEFAULT_ROLE.to_string(),
            google_client_id: None,
            google_client_secret: None,
        }
    }

    #[test]
    fn builds_config_without_social_providers() -> Result<()> {
        let config = auth_config(&args())?;
        assert_eq!(config.auth_url().as_str(), "http://auth.test/");
        assert_eq!(config.home_url(), "http://localhost:8080/");
        assert!(config.email_and_password().enabled);
        assert_eq!(config.social_provider_names().count(), 0);
        Ok(())
    }

    #[test]
    fn registers_google_when_both_credentials_present() -> Result<()> {
        let config = auth_config(&Args {
            google_client_id: Some("client-id".to_string()),
            google_client_secret: Some(SecretString::from("client-secret".to_string())),
            ..args()
        })?;
        assert!(config.social_provider("google").is_some());
        Ok(())
    }

    #[test]
    fn rejects_blank_google_secret() {
        let result = auth_config(&Args {
            google_client_id: Some("client-id".to_string()),
            google_client_secret: Some(SecretString::from("  ".to_string())),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_auth_url() {
        let result = auth_config(&Args {
            auth_url: "ftp://auth.test".to_string(),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_short_commit() {
        assert_eq!(short_commit("0123456789abcdef"), "0123456");
        assert_eq!(short_commit("abc"), "abc");
    }
}
