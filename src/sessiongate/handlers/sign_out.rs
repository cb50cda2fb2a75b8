use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{error, info, instrument};

use super::{SIGN_IN_ROUTE, html_page, with_cookies};
use crate::auth::SharedProvider;
use crate::sessiongate::views::Views;

/// Sign-out control target.
///
/// On confirmation the browser gets exactly one navigation (`303` to
/// `/sign-in`) together with the cookies the auth service cleared. On failure
/// there is no navigation: a `502` page offers the control again.
#[instrument(skip_all)]
pub async fn sign_out(
    headers: HeaderMap,
    provider: Extension<SharedProvider>,
    views: Extension<Arc<Views>>,
) -> Response {
    match provider.sign_out(&headers).await {
        Ok(reply) => {
            info!("Session terminated");
            with_cookies(Redirect::to(SIGN_IN_ROUTE).into_response(), reply.cookies)
        }
        Err(err) => {
            error!("Failed to terminate session: {err}");
            html_page(StatusCode::BAD_GATEWAY, views.sign_out_failed())
        }
    }
}
