//! Lightweight in-process request metrics.
//!
//! `track` wraps every request: it counts by matched route and status, keeps
//! an in-flight gauge, and records latency. The `/metrics` handler renders the
//! registry.

pub mod metrics;

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub use metrics::HttpMetrics;

pub async fn track(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let obs = state.obs();
    let started = Instant::now();
    obs.in_flight.inc(&[]);
    let res = next.run(req).await;
    obs.in_flight.dec(&[]);

    let status = res.status();
    obs.requests.inc(&[("route", route.as_str()), ("status", status.as_str())]);
    obs.request_duration.observe(&[("route", route.as_str())], started.elapsed());
    res
}
