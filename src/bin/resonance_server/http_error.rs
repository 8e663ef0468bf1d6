use super::*;

pub(super) fn json_bytes(bytes: Vec<u8>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        axum::body::Bytes::from(bytes),
    )
        .into_response()
}

/// Caller-facing error body. Internal detail only goes to the log.
pub(super) fn search_error(err: SearchError) -> Response {
    if err.is_client_error() {
        warn!(error = %err, "rejected search request");
    } else {
        error!(error = %err, "search request failed");
    }

    (
        err.status(),
        Json(serde_json::json!({"error": err.public_message()})),
    )
        .into_response()
}

pub(super) fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "not found"})),
    )
        .into_response()
}
