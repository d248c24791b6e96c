//! Basic-auth gate for the `/admin` routes.
//!
//! One credential pair from config. The stores never see credentials; they
//! only run once this middleware has let the request through.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use kpiboard_core::error::KpiError;

use crate::app_state::AppState;
use crate::config::AdminSection;
use crate::error::ApiError;

const CHALLENGE: &str = "Basic realm=\"Authorization Required\"";

/// Decode an `Authorization: Basic ...` value into `(user, password)`.
pub fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let raw = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(raw).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

pub fn is_authorized(headers: &HeaderMap, admin: &AdminSection) -> bool {
    let Some((user, pass)) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(decode_basic)
    else {
        return false;
    };
    // Evaluate both halves so timing does not reveal which one failed.
    let user_ok = ct_eq(user.as_bytes(), admin.username.as_bytes());
    let pass_ok = ct_eq(pass.as_bytes(), admin.password.as_bytes());
    user_ok & pass_ok
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if is_authorized(req.headers(), &state.cfg().admin) {
        return next.run(req).await;
    }

    state.obs().auth_failures.inc(&[]);
    tracing::warn!(path = %req.uri().path(), "admin auth rejected");

    let mut res = ApiError(KpiError::AuthFailed).into_response();
    res.headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    res
}
