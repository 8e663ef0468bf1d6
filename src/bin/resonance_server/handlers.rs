use super::*;

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub(super) async fn search(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = match SearchParams::from_pairs(pairs).validate() {
        Ok(q) => q,
        Err(err) => return search_error(err),
    };

    match state.search.run(&query).await {
        Ok(result) => json_bytes(result.into_bytes()),
        Err(err) => search_error(err),
    }
}

pub(super) async fn fallback() -> Response {
    not_found()
}
