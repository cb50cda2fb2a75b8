use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use super::html_page;
use crate::auth::SharedProvider;
use crate::sessiongate::views::Views;

// axum handler for the home view
#[instrument(skip_all)]
pub async fn home(
    headers: HeaderMap,
    provider: Extension<SharedProvider>,
    views: Extension<Arc<Views>>,
) -> Response {
    // Rendering waits for the lookup; a failed lookup renders as signed out.
    let session = match provider.get_session(&headers).await {
        Ok(session) => session,
        Err(err) if err.is_fatal() => {
            error!("Session lookup cannot be performed: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Err(err) => {
            warn!("Session lookup failed, rendering signed-out view: {err}");
            None
        }
    };

    debug!("session present: {}", session.is_some());

    html_page(StatusCode::OK, views.home(session.as_ref()))
}
