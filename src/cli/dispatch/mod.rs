use crate::cli::{
    actions::{Action, server::Args},
    commands::auth,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let auth_url = matches
        .get_one::<String>(auth::ARG_AUTH_URL)
        .cloned()
        .context("missing required argument: --auth-url")?;
    let public_url = matches
        .get_one::<String>(auth::ARG_PUBLIC_URL)
        .cloned()
        .context("missing required argument: --public-url")?;
    let auth_timeout = Duration::from_secs(
        matches
            .get_one::<u64>(auth::ARG_AUTH_TIMEOUT)
            .copied()
            .unwrap_or(5),
    );
    let email_password = matches
        .get_one::<bool>(auth::ARG_EMAIL_PASSWORD)
        .copied()
        .unwrap_or(true);
    let default_role = matches
        .get_one::<String>(auth::ARG_DEFAULT_ROLE)
        .cloned()
        .unwrap_or_else(|| crate::auth::DEFAULT_ROLE.to_string());

    let google_client_id = matches.get_one::<String>(auth::ARG_GOOGLE_CLIENT_ID).cloned();
    let google_client_secret = matches
        .get_one::<String>(auth::ARG_GOOGLE_CLIENT_SECRET)
        .cloned()
        .map(SecretString::from);

    Ok(Action::Server(Args {
        port,
        auth_url,
        public_url,
        auth_timeout,
        email_password,
        default_role,
        google_client_id,
        google_client_secret,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn builds_server_action() -> Result<()> {
        let matches = commands::new().try_get_matches_from(vec![
            "sessiongate",
            "--port",
            "9090",
            "--auth-url",
            "https://auth.example.com",
            "--auth-timeout-seconds",
            "2",
            "--email-password",
            "false",
            "--google-client-id",
            "client-id",
            "--google-client-secret",
            "client-secret",
        ])?;

        let Action::Server(args) = handler(&matches)?;
        assert_eq!(args.port, 9090);
        assert_eq!(args.auth_url, "https://auth.example.com");
        assert_eq!(args.auth_timeout, Duration::from_secs(2));
        assert!(!args.email_password);
        assert_eq!(args.google_client_id.as_deref(), Some("client-id"));
        assert_eq!(
            args.google_client_secret
                .as_ref()
                .map(|s| s.expose_secret().to_string()),
            Some("client-secret".to_string())
        );
        Ok(())
    }
}
