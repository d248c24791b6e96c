//! Category-scoped attachment repository.
//!
//! Layout: `{root}/{category}/{name}`. A category exists exactly when its
//! directory does. No lock is taken here; per-file atomicity comes from the
//! storage layer and concurrent uploads of one name are last-writer-wins.

pub mod sanitize;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{KpiError, Result};
use crate::storage::ByteStorage;

pub use sanitize::{sanitize_category, sanitize_filename};

/// Public URL prefix under which the upload root is served.
pub const DEFAULT_URL_PREFIX: &str = "/uploads";

/// One listed attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// Snapshot of a category's files. Iterating builds [`Attachment`]s on the
/// fly and can be repeated.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    category: String,
    url_prefix: String,
    names: Vec<String>,
}

impl Listing {
    /// Category this snapshot was taken from.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the category has no files (or does not exist).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attachments with their public URLs, in name order.
    pub fn iter(&self) -> impl Iterator<Item = Attachment> + '_ {
        self.names.iter().map(move |name| Attachment {
            url: format!("{}/{}/{}", self.url_prefix, self.category, name),
            name: name.clone(),
        })
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = Attachment;
    type IntoIter = Box<dyn Iterator<Item = Attachment> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Owner of the upload directory subtree.
pub struct FileRepository {
    root: PathBuf,
    url_prefix: String,
    storage: Arc<dyn ByteStorage>,
}

impl FileRepository {
    /// Repository rooted at `root`, listing URLs under `/uploads`.
    pub fn new(root: impl Into<PathBuf>, storage: Arc<dyn ByteStorage>) -> Self {
        Self {
            root: root.into(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            storage,
        }
    }

    /// Change the URL prefix used in listings (no trailing slash).
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    /// Upload root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn category_dir(&self, category: &str) -> Result<PathBuf> {
        let category = sanitize_category(category)?;
        Ok(self.root.join(category))
    }

    fn attachment_path(&self, category: &str, raw_filename: &str) -> Result<(PathBuf, String)> {
        let dir = self.category_dir(category)?;
        let name = sanitize_filename(raw_filename)?;
        let path = dir.join(&name);
        if path.parent() != Some(dir.as_path()) {
            return Err(KpiError::Input(format!("filename escapes category: {raw_filename:?}")));
        }
        Ok((path, name))
    }

    /// Files directly under `category`. A missing category lists as empty.
    pub fn list(&self, category: &str) -> Result<Listing> {
        let dir = self.category_dir(category)?;
        let entries = match self.storage.list_entries(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(category, error = %e, "category listing failed; reporting empty");
                Vec::new()
            }
        };

        let names = entries.into_iter().filter(|e| !e.is_dir).map(|e| e.name).collect();
        Ok(Listing {
            category: category.to_string(),
            url_prefix: self.url_prefix.clone(),
            names,
        })
    }

    /// Write an attachment, creating the category on first use and replacing
    /// any file of the same sanitized name. Returns the stored name.
    pub fn store(&self, category: &str, raw_filename: &str, content: Option<&[u8]>) -> Result<String> {
        let content = content.ok_or_else(|| KpiError::Input("no file payload supplied".into()))?;
        let (path, name) = self.attachment_path(category, raw_filename)?;

        if let Some(dir) = path.parent() {
            self.storage.make_dir_all(dir).map_err(|e| {
                KpiError::Persistence(format!("create category {category} failed: {e}"))
            })?;
        }
        self.storage.write_all(&path, content).map_err(|e| {
            tracing::error!(category, name = %name, error = %e, "attachment write failed");
            KpiError::Persistence(format!("write {category}/{name} failed: {e}"))
        })?;

        tracing::info!(category, name = %name, bytes = content.len(), "attachment stored");
        Ok(name)
    }

    /// Delete an attachment. Absent and unremovable targets both yield `NotFound`.
    pub fn remove(&self, category: &str, raw_filename: &str) -> Result<()> {
        let (path, name) = self.attachment_path(category, raw_filename)?;
        self.storage.remove(&path).map_err(|e| {
            tracing::debug!(category, name = %name, error = %e, "attachment remove failed");
            KpiError::NotFound(format!("{category}/{name}: {e}"))
        })?;
        tracing::info!(category, name = %name, "attachment removed");
        Ok(())
    }
}
