//! Sign-in page and the delegations behind its forms.
//!
//! Credentials and OAuth state never stay here: the form data is forwarded to
//! the auth service and the cookies it issues are passed back to the browser.

use axum::{
    extract::{Extension, Form, Path},
    http::{HeaderMap, StatusCode, header::LOCATION},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{html_page, valid_email, with_cookies};
use crate::auth::{AuthConfig, EmailCredentials, ProviderError, SharedProvider};
use crate::sessiongate::views::{SignInPage, Views};

const INVALID_EMAIL: &str = "Enter a valid email address.";
const REJECTED: &str = "Invalid email or password.";
const UNAVAILABLE: &str = "Sign-in is unavailable right now. Please try again.";

// No Debug derive: holds the raw password.
#[derive(Deserialize)]
pub struct EmailSignInForm {
    email: String,
    password: String,
}

fn page<'a>(config: &'a AuthConfig, error: Option<&'a str>, email: &'a str) -> SignInPage<'a> {
    SignInPage {
        email_enabled: config.email_and_password().enabled,
        providers: config.social_provider_names().collect(),
        error,
        email,
    }
}

// axum handler for the sign-in page
pub async fn sign_in_page(
    config: Extension<Arc<AuthConfig>>,
    views: Extension<Arc<Views>>,
) -> Response {
    html_page(StatusCode::OK, views.sign_in(&page(&config, None, "")))
}

#[instrument(skip_all)]
pub async fn sign_in_email(
    headers: HeaderMap,
    provider: Extension<SharedProvider>,
    config: Extension<Arc<AuthConfig>>,
    views: Extension<Arc<Views>>,
    Form(form): Form<EmailSignInForm>,
) -> Response {
    if !config.email_and_password().enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    let email = form.email.trim().to_lowercase();
    if !valid_email(&email) {
        return html_page(
            StatusCode::BAD_REQUEST,
            views.sign_in(&page(&config, Some(INVALID_EMAIL), &email)),
        );
    }

    let credentials = EmailCredentials {
        email,
        password: SecretString::from(form.password),
    };

    match provider.sign_in_email(&headers, &credentials).await {
        Ok(reply) => {
            info!("Email sign-in accepted");
            with_cookies(
                Redirect::to(config.home_url()).into_response(),
                reply.cookies,
            )
        }
        Err(ProviderError::Rejected) => {
            warn!("Email sign-in rejected");
            html_page(
                StatusCode::UNAUTHORIZED,
                views.sign_in(&page(&config, Some(REJECTED), &credentials.email)),
            )
        }
        Err(err) => {
            error!("Email sign-in failed: {err}");
            html_page(
                StatusCode::BAD_GATEWAY,
                views.sign_in(&page(&config, Some(UNAVAILABLE), &credentials.email)),
            )
        }
    }
}

#[instrument(skip_all)]
pub async fn sign_in_social(
    Path(name): Path<String>,
    headers: HeaderMap,
    provider: Extension<SharedProvider>,
    config: Extension<Arc<AuthConfig>>,
    views: Extension<Arc<Views>>,
) -> Response {
    let name = name.to_lowercase();
    if config.social_provider(&name).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    match provider
        .sign_in_social(&headers, &name, config.home_url())
        .await
    {
        Ok(redirect) => with_cookies(
            (StatusCode::SEE_OTHER, [(LOCATION, redirect.location)]).into_response(),
            redirect.cookies,
        ),
        Err(err) => {
            error!("Social sign-in with {name} failed: {err}");
            html_page(
                StatusCode::BAD_GATEWAY,
                views.sign_in(&page(&config, Some(UNAVAILABLE), "")),
            )
        }
    }
}
