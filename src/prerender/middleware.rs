//! Prerender middleware.
//! Serves crawlers from the prerender service, everyone else from the app.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};

use super::classifier::should_prerender;
use super::renderer::Prerender;
use crate::http::X_REQUEST_ID;
use crate::observability::metrics;

pub async fn prerender_middleware(
    State(prerender): State<Arc<Prerender>>,
    req: Request,
    next: Next,
) -> Response {
    if !should_prerender(&req) {
        metrics::record_outcome(metrics::OUTCOME_PASSTHROUGH);
        return next.run(req).await;
    }

    // Body stays aside for the fallback path.
    let (parts, body) = req.into_parts();
    let request_id = parts
        .headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    match prerender.render(&parts).await {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                path = %parts.uri.path(),
                status = %response.status(),
                "Serving prerendered page"
            );
            metrics::record_outcome(metrics::OUTCOME_RENDERED);
            response
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                path = %parts.uri.path(),
                reason = err.reason(),
                error = %err,
                "Prerender failed, falling back to origin"
            );
            metrics::record_fallback(err.reason());
            next.run(Request::from_parts(parts, body)).await
        }
    }
}

/// Put `router` behind the prerender middleware.
pub fn with_prerender<S>(router: Router<S>, prerender: Arc<Prerender>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(prerender, prerender_middleware))
}
