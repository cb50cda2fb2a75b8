//! Route handlers and the response helpers they share.

pub mod health;
pub mod home;
pub mod sign_in;
pub mod sign_out;

pub use self::health::health;
pub use self::home::home;
pub use self::sign_in::{sign_in_email, sign_in_page, sign_in_social};
pub use self::sign_out::sign_out;

use axum::{
    http::{HeaderValue, StatusCode, header::SET_COOKIE},
    response::{Html, IntoResponse, Response},
};
use regex::Regex;
use tracing::error;

/// Navigation target after a confirmed sign-out.
pub const SIGN_IN_ROUTE: &str = "/sign-in";

/// Lightweight email sanity check; the auth service does the real validation.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Wrap a rendered view, or answer 500 if rendering failed.
pub(crate) fn html_page(
    status: StatusCode,
    rendered: Result<String, minijinja::Error>,
) -> Response {
    match rendered {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            error!("Failed to render view: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Pass the auth service's `Set-Cookie` headers through to the browser.
pub(crate) fn with_cookies(mut response: Response, cookies: Vec<HeaderValue>) -> Response {
    for cookie in cookies {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}
