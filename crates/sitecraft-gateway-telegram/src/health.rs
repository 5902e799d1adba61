//! Liveness routes served next to the webhook endpoint.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

pub fn router() -> Router {
    Router::new()
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
}

pub async fn livez() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

pub async fn readyz() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
