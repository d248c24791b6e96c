//! Name sanitization for category folders and attachment files.
//!
//! Filenames are reduced to their last path component (`../../etc/passwd`
//! becomes `passwd`). Category ids are not reduced: anything that could act
//! as a path is rejected outright.

use crate::error::{KpiError, Result};
use crate::storage::TMP_PREFIX;

fn is_sep(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Base name of `raw`, accepting both `/` and `\` as separators.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    if raw.contains('\0') {
        return Err(KpiError::Input("filename contains NUL".into()));
    }
    let trimmed = raw.trim_end_matches(is_sep);
    let base = trimmed.rsplit(is_sep).next().unwrap_or_default();
    match base {
        "" => Err(KpiError::Input(format!("filename has no usable name: {raw:?}"))),
        "." | ".." => Err(KpiError::Input(format!("filename resolves outside category: {raw:?}"))),
        reserved if reserved.starts_with(TMP_PREFIX) => {
            Err(KpiError::Input(format!("filename uses a reserved prefix: {raw:?}")))
        }
        ok => Ok(ok.to_string()),
    }
}

/// Validate a category id as a single directory name.
pub fn sanitize_category(raw: &str) -> Result<&str> {
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(KpiError::Input(format!("invalid category: {raw:?}")));
    }
    if raw.chars().any(|c| is_sep(c) || c == '\0') {
        return Err(KpiError::Input(format!("category must be a single path segment: {raw:?}")));
    }
    Ok(raw)
}
