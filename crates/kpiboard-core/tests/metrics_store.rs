#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use kpiboard_core::{
    ByteStorage, Clock, DefaultReason, DirEntry, FsStorage, LoadOutcome, MetricsRecord, MetricsStore,
};

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Storage whose writes always fail.
struct ReadOnlyDisk;

impl ByteStorage for ReadOnlyDisk {
    fn read_all(&self, _: &Path) -> io::Result<Vec<u8>> {
        Err(io::ErrorKind::NotFound.into())
    }
    fn write_all(&self, _: &Path, _: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
    fn list_entries(&self, _: &Path) -> io::Result<Vec<DirEntry>> {
        Ok(vec![])
    }
    fn remove(&self, _: &Path) -> io::Result<()> {
        Ok(())
    }
    fn make_dir_all(&self, _: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn jan_15() -> Arc<dyn Clock> {
    Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()))
}

fn store_in(dir: &Path) -> MetricsStore {
    MetricsStore::new(dir.join("metrics.json"), Arc::new(FsStorage::new())).with_clock(jan_15())
}

fn sample() -> MetricsRecord {
    MetricsRecord {
        open_tickets: "12".into(),
        sla: "98%".into(),
        csat: "4.8".into(),
        avg_time: "2h".into(),
        fcr: "80%".into(),
        incidents: "20%".into(),
        last_updated: "ignored".into(),
    }
}

#[test]
fn fresh_store_loads_default() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());

    assert_eq!(store.load_outcome(), LoadOutcome::UseDefault(DefaultReason::Missing));
    let r = store.load();
    assert_eq!(r, MetricsRecord::default());
    assert_eq!(r.open_tickets, "0");
    assert_eq!(r.sla, "100%");
    assert_eq!(r.csat, "5.0");
    assert_eq!(r.avg_time, "1h");
    assert_eq!(r.fcr, "85%");
    assert_eq!(r.incidents, "15%");
    assert_eq!(r.last_updated, "-");

    // The default is never written back.
    assert!(!dir.path().join("metrics.json").exists());
}

#[test]
fn corrupt_file_loads_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("metrics.json"), b"{ not json").unwrap();
    let store = store_in(dir.path());

    assert!(matches!(
        store.load_outcome(),
        LoadOutcome::UseDefault(DefaultReason::Corrupt(_))
    ));
    assert_eq!(store.load(), MetricsRecord::default());
}

#[test]
fn unreadable_path_loads_default() {
    let dir = tempfile::tempdir().unwrap();
    // A directory where the file should be: reading fails with something other than NotFound.
    std::fs::create_dir(dir.path().join("metrics.json")).unwrap();
    let store = store_in(dir.path());

    assert!(matches!(
        store.load_outcome(),
        LoadOutcome::UseDefault(DefaultReason::Unreadable(_))
    ));
    assert_eq!(store.load(), MetricsRecord::default());
}

#[test]
fn save_stamps_date_and_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());

    let saved = store.save(sample()).unwrap();
    assert_eq!(saved.last_updated, "15.01.2024");

    let loaded = store.load();
    let expected = MetricsRecord { last_updated: "15.01.2024".into(), ..sample() };
    assert_eq!(loaded, expected);
    assert_eq!(store.load_outcome(), LoadOutcome::Loaded(expected));
}

#[test]
fn saved_file_is_indented_snake_case_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    store.save(sample()).unwrap();

    let text = std::fs::read_to_string(dir.path().join("metrics.json")).unwrap();
    assert!(text.contains("\n  \"open_tickets\": \"12\""), "{text}");
    assert!(text.contains("\"last_updated\": \"15.01.2024\""), "{text}");
}

#[test]
fn save_replaces_whole_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    store.save(sample()).unwrap();

    let partial = store.save_json(br#"{"sla":"91%"}"#).unwrap();
    assert_eq!(partial.sla, "91%");
    assert_eq!(store.load().open_tickets, "");
}

#[test]
fn malformed_payload_is_validation_error_and_keeps_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(dir.path());
    store.save(sample()).unwrap();

    let err = store.save_json(br#"{"csat": 4.8}"#).unwrap_err();
    assert_eq!(err.client_code().as_str(), "VALIDATION");
    assert_eq!(store.load().csat, "4.8");
}

#[test]
fn failed_write_is_persistence_error() {
    let store = MetricsStore::new("metrics.json", Arc::new(ReadOnlyDisk)).with_clock(jan_15());
    let err = store.save(sample()).unwrap_err();
    assert_eq!(err.client_code().as_str(), "PERSISTENCE");
    assert_eq!(store.load(), MetricsRecord::default());
}

#[test]
fn concurrent_saves_and_loads_never_see_torn_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(store_in(dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for j in 0..25 {
                    let v = format!("{i}-{j}");
                    let rec = MetricsRecord {
                        open_tickets: v.clone(),
                        sla: v.clone(),
                        csat: v.clone(),
                        avg_time: v.clone(),
                        fcr: v.clone(),
                        incidents: v,
                        last_updated: String::new(),
                    };
                    store.save(rec).unwrap();

                    let seen = store.load_outcome();
                    let LoadOutcome::Loaded(r) = &seen else {
                        panic!("expected a stored record, got {seen:?}");
                    };
                    // Every field was written with the same value in one save.
                    assert_eq!(r.open_tickets, r.incidents);
                    assert_eq!(r.sla, r.fcr);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
