//! Attachment listing, upload and delete.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use kpiboard_core::error::KpiError;
use kpiboard_core::Attachment;

use super::blocking;
use crate::app_state::AppState;
use crate::error::ApiError;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub files: Vec<Attachment>,
}

pub async fn list(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<FilesResponse>, ApiError> {
    let files = state.files();
    let listing = blocking(move || files.list(&category)).await?;
    Ok(Json(FilesResponse { files: listing.iter().collect() }))
}

pub async fn upload(
    State(state): State<AppState>,
    Path(category): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| KpiError::Input(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| KpiError::Input(format!("reading upload failed: {e}")))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, content) = match upload {
        Some((name, data)) => (name, Some(data)),
        None => (String::new(), None),
    };
    let size = content.as_ref().map(|c| c.len()).unwrap_or(0);

    let files = state.files();
    let stored = blocking(move || files.store(&category, &filename, content.as_deref())).await?;

    state.obs().upload_bytes.add(&[], size as u64);
    Ok(Json(json!({ "status": "uploaded", "name": stored })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((category, filename)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let files = state.files();
    blocking(move || files.remove(&category, &filename)).await?;
    Ok(Json(json!({ "status": "deleted" })))
}
