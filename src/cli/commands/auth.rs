use clap::{Arg, ArgAction, Command};

pub const ARG_AUTH_URL: &str = "auth-url";
pub const ARG_AUTH_TIMEOUT: &str = "auth-timeout-seconds";
pub const ARG_PUBLIC_URL: &str = "public-url";
pub const ARG_EMAIL_PASSWORD: &str = "email-password";
pub const ARG_GOOGLE_CLIENT_ID: &str = "google-client-id";
pub const ARG_GOOGLE_CLIENT_SECRET: &str = "google-client-secret";
pub const ARG_DEFAULT_ROLE: &str = "default-role";

pub fn with_args(command: Command) -> Command {
    let command = with_service_args(command);
    with_method_args(command)
}

fn with_service_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_AUTH_URL)
                .long(ARG_AUTH_URL)
                .help("Base URL of the auth service, example: https://auth.example.com")
                .env("SESSIONGATE_AUTH_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_AUTH_TIMEOUT)
                .long(ARG_AUTH_TIMEOUT)
                .help("Timeout in seconds for every call to the auth service")
                .env("SESSIONGATE_AUTH_TIMEOUT_SECONDS")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_PUBLIC_URL)
                .long(ARG_PUBLIC_URL)
                .help("Public URL of this front-end, used as the sign-in callback")
                .env("SESSIONGATE_PUBLIC_URL")
                .default_value("http://localhost:8080/"),
        )
}

fn with_method_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL_PASSWORD)
                .long(ARG_EMAIL_PASSWORD)
                .help("Enable email and password sign-in")
                .env("SESSIONGATE_EMAIL_PASSWORD")
                .default_value("true")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            Arg::new(ARG_GOOGLE_CLIENT_ID)
                .long(ARG_GOOGLE_CLIENT_ID)
                .help("Google OAuth client id")
                .env("GOOGLE_CLIENT_ID")
                .requires(ARG_GOOGLE_CLIENT_SECRET),
        )
        .arg(
            Arg::new(ARG_GOOGLE_CLIENT_SECRET)
                .long(ARG_GOOGLE_CLIENT_SECRET)
                .help("Google OAuth client secret")
                .env("GOOGLE_CLIENT_SECRET")
                .hide_env_values(true)
                .requires(ARG_GOOGLE_CLIENT_ID),
        )
        .arg(
            Arg::new(ARG_DEFAULT_ROLE)
                .long(ARG_DEFAULT_ROLE)
                .help("Role assigned to users that have none")
                .env("SESSIONGATE_DEFAULT_ROLE")
                .default_value(crate::auth::DEFAULT_ROLE),
        )
}
