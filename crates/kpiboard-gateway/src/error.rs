//! HTTP mapping for core errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use kpiboard_core::error::{ClientCode, KpiError};

/// `KpiError` as an axum response: `{ "error": CODE, "message": text }`.
#[derive(Debug)]
pub struct ApiError(pub KpiError);

impl From<KpiError> for ApiError {
    fn from(e: KpiError) -> Self {
        Self(e)
    }
}

pub fn status_for(code: ClientCode) -> StatusCode {
    match code {
        ClientCode::Validation | ClientCode::Input | ClientCode::BadRequest => StatusCode::BAD_REQUEST,
        ClientCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ClientCode::NotFound => StatusCode::NOT_FOUND,
        ClientCode::AuthFailed => StatusCode::UNAUTHORIZED,
        ClientCode::Persistence | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = status_for(code);
        if status.is_server_error() {
            tracing::error!(code = code.as_str(), error = %self.0, "request failed");
        } else {
            tracing::debug!(code = code.as_str(), error = %self.0, "request rejected");
        }
        let body = Json(json!({
            "error": code.as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
