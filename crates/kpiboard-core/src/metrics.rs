//! Single-record metrics store.
//!
//! The dashboard shows exactly one set of KPI values. It lives in one JSON
//! file, is replaced wholesale on save, and falls back to a fixed default
//! whenever the file is missing or unreadable. `load` and `save` share one
//! lock, so a reader never interleaves with a writer.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{KpiError, Result};
use crate::storage::ByteStorage;

/// Stamp format for `last_updated` (`DD.MM.YYYY`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// The persisted KPI values. All fields are display strings; nothing is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsRecord {
    #[serde(default)]
    pub open_tickets: String,
    #[serde(default)]
    pub sla: String,
    #[serde(default)]
    pub csat: String,
    #[serde(default)]
    pub avg_time: String,
    /// First contact resolution.
    #[serde(default)]
    pub fcr: String,
    /// Share of incidents among all requests.
    #[serde(default)]
    pub incidents: String,
    #[serde(default)]
    pub last_updated: String,
}

impl Default for MetricsRecord {
    fn default() -> Self {
        Self {
            open_tickets: "0".into(),
            sla: "100%".into(),
            csat: "5.0".into(),
            avg_time: "1h".into(),
            fcr: "85%".into(),
            incidents: "15%".into(),
            last_updated: "-".into(),
        }
    }
}

impl MetricsRecord {
    /// Decode a caller payload. Unknown and missing fields are accepted;
    /// anything that is not a JSON object of strings is a validation error.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| KpiError::Validation(format!("invalid metrics payload: {e}")))
    }
}

/// Why `load` fell back to the default record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// Nothing has been saved yet.
    Missing,
    /// The backing file exists but could not be read.
    Unreadable(String),
    /// The backing file was read but is not a valid record.
    Corrupt(String),
}

/// Result of reading the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(MetricsRecord),
    UseDefault(DefaultReason),
}

impl LoadOutcome {
    pub fn into_record(self) -> MetricsRecord {
        match self {
            LoadOutcome::Loaded(r) => r,
            LoadOutcome::UseDefault(_) => MetricsRecord::default(),
        }
    }
}

/// Source of "today" for the `last_updated` stamp.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Owner of the metrics file.
pub struct MetricsStore {
    path: PathBuf,
    storage: Arc<dyn ByteStorage>,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl MetricsStore {
    pub fn new(path: impl Into<PathBuf>, storage: Arc<dyn ByteStorage>) -> Self {
        Self {
            path: path.into(),
            storage,
            clock: Arc::new(SystemClock),
            lock: Mutex::new(()),
        }
    }

    /// Replace the clock (tests pin the date).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The guard protects no data of its own, so a poisoned lock is still usable.
    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read the record, reporting why the default is used when it is.
    pub fn load_outcome(&self) -> LoadOutcome {
        let _g = self.guard();
        self.read_locked()
    }

    /// Current record, or the default when none is readable.
    pub fn load(&self) -> MetricsRecord {
        let outcome = self.load_outcome();
        if let LoadOutcome::UseDefault(reason) = &outcome {
            match reason {
                DefaultReason::Missing => {
                    tracing::debug!(path = %self.path.display(), "no metrics saved yet; using defaults")
                }
                other => {
                    tracing::warn!(path = %self.path.display(), reason = ?other, "metrics unreadable; using defaults")
                }
            }
        }
        outcome.into_record()
    }

    /// Stamp `last_updated` with today's date and replace the stored record.
    pub fn save(&self, mut record: MetricsRecord) -> Result<MetricsRecord> {
        record.last_updated = self.clock.today().format(DATE_FORMAT).to_string();

        let bytes = serde_json::to_vec_pretty(&record)
            .map_err(|e| KpiError::Internal(format!("encode metrics failed: {e}")))?;

        let _g = self.guard();
        self.storage.write_all(&self.path, &bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "metrics write failed");
            KpiError::Persistence(format!("write {} failed: {e}", self.path.display()))
        })?;

        tracing::info!(last_updated = %record.last_updated, "metrics saved");
        Ok(record)
    }

    /// Decode a raw JSON payload and save it.
    pub fn save_json(&self, payload: &[u8]) -> Result<MetricsRecord> {
        let record = MetricsRecord::from_json(payload)?;
        self.save(record)
    }

    fn read_locked(&self) -> LoadOutcome {
        let bytes = match self.storage.read_all(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return LoadOutcome::UseDefault(DefaultReason::Missing)
            }
            Err(e) => return LoadOutcome::UseDefault(DefaultReason::Unreadable(e.to_string())),
        };
        match serde_json::from_slice::<MetricsRecord>(&bytes) {
            Ok(r) => LoadOutcome::Loaded(r),
            Err(e) => LoadOutcome::UseDefault(DefaultReason::Corrupt(e.to_string())),
        }
    }
}
