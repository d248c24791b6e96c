//! Shared application state for the kpiboard gateway.
//!
//! Owns the two stores and the metrics registry; handlers clone the `Arc`s
//! they need into blocking tasks.

use std::sync::Arc;

use kpiboard_core::error::{KpiError, Result};
use kpiboard_core::{ByteStorage, FileRepository, FsStorage, MetricsStore};

use crate::config::BoardConfig;
use crate::obs::HttpMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: BoardConfig,
    metrics_store: Arc<MetricsStore>,
    files: Arc<FileRepository>,
    obs: HttpMetrics,
}

impl AppState {
    /// Build application state on the local filesystem.
    /// Creates the upload root so static serving has a directory to point at.
    pub fn new(cfg: BoardConfig) -> Result<Self> {
        let storage: Arc<dyn ByteStorage> = Arc::new(FsStorage::new());

        storage.make_dir_all(&cfg.storage.uploads_root).map_err(|e| {
            KpiError::Persistence(format!(
                "create upload root {} failed: {e}",
                cfg.storage.uploads_root.display()
            ))
        })?;

        let metrics_store = MetricsStore::new(cfg.storage.metrics_file.clone(), Arc::clone(&storage));
        let files = FileRepository::new(cfg.storage.uploads_root.clone(), storage);

        tracing::info!(
            metrics_file = %cfg.storage.metrics_file.display(),
            uploads_root = %cfg.storage.uploads_root.display(),
            "storage ready"
        );
        Ok(Self::from_parts(cfg, metrics_store, files))
    }

    /// Assemble state from prebuilt stores.
    pub fn from_parts(cfg: BoardConfig, metrics_store: MetricsStore, files: FileRepository) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                metrics_store: Arc::new(metrics_store),
                files: Arc::new(files),
                obs: HttpMetrics::default(),
            }),
        }
    }

    pub fn cfg(&self) -> &BoardConfig {
        &self.inner.cfg
    }

    pub fn metrics_store(&self) -> Arc<MetricsStore> {
        Arc::clone(&self.inner.metrics_store)
    }

    pub fn files(&self) -> Arc<FileRepository> {
        Arc::clone(&self.inner.files)
    }

    pub fn obs(&self) -> &HttpMetrics {
        &self.inner.obs
    }

    pub fn is_draining(&self) -> bool {
        self.inner.obs.is_draining()
    }
}
