//! HTTP route registration for the search proxy.

use super::*;

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/search", get(search))
        .fallback(fallback)
        .with_state(state)
}
