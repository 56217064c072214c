//! Liveness probe
//!
//! `GET /health` answers without touching the store, so it stays green while
//! the database is unreachable.

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

impl Liveness {
    fn current() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(|| async { Json(Liveness::current()) }))
}
