//! kpiboard core: the persistence layer behind the support-metrics dashboard.
//!
//! Two independent components live here:
//! - [`MetricsStore`]: a single JSON record guarded by one lock, with a fixed
//!   default when nothing (or nothing readable) is on disk.
//! - [`FileRepository`]: per-category attachment folders with strict name
//!   containment.
//!
//! Both sit on top of the [`ByteStorage`] abstraction. The crate carries no
//! HTTP or async runtime dependency; the gateway wires it to axum.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `KpiError`/`Result` so a bad upload or a broken disk never takes
//! the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod files;
pub mod metrics;
pub mod storage;

pub use error::{ClientCode, KpiError, Result};
pub use files::{Attachment, FileRepository, Listing};
pub use metrics::{Clock, DefaultReason, LoadOutcome, MetricsRecord, MetricsStore, SystemClock};
pub use storage::{ByteStorage, DirEntry, FsStorage};
