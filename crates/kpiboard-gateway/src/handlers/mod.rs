//! HTTP handlers for the dashboard API.
//!
//! The stores are synchronous; every call goes through [`blocking`] so the
//! metrics lock and disk I/O never stall the async workers.

pub mod admin;
pub mod files;
pub mod metrics;

use kpiboard_core::error::{KpiError, Result};

use crate::error::ApiError;

pub(crate) async fn blocking<T, F>(f: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| KpiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}
