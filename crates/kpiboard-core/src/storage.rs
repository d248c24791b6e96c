//! Durable byte storage.
//!
//! [`ByteStorage`] is the seam between the stores and the disk. Errors are
//! plain `std::io::Error` so callers can tell `NotFound` apart from every
//! other failure; translating them into [`crate::KpiError`] is the caller's job.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Whole-file byte storage.
pub trait ByteStorage: Send + Sync {
    /// Read the full contents of `path`.
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or replace `path` with `bytes`.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Direct children of `dir`.
    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

    /// Delete the file at `path`.
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Create `path` and any missing parents.
    fn make_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Prefix for in-flight temporary files; hidden from listings and reserved,
/// so no stored file may use it.
pub const TMP_PREFIX: &str = ".kpiboard-tmp-";

/// Local filesystem storage.
///
/// `write_all` goes through a sibling temp file and a rename, so concurrent
/// readers see either the old or the new content, never a torn write.
#[derive(Debug, Default)]
pub struct FsStorage {
    seq: AtomicU64,
}

impl FsStorage {
    pub fn new() -> Self {
        Self { seq: AtomicU64::new(0) }
    }

    fn tmp_path_for(&self, path: &Path) -> PathBuf {
        // Kept short and independent of the target name so it never exceeds NAME_MAX.
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let tmp = format!("{TMP_PREFIX}{}-{n}", std::process::id());
        match path.parent() {
            Some(dir) => dir.join(tmp),
            None => PathBuf::from(tmp),
        }
    }
}

impl ByteStorage for FsStorage {
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let tmp = self.tmp_path_for(path);
        let res = (|| {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(bytes)?;
            f.sync_all()?;
            fs::rename(&tmp, path)
        })();
        if res.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        res
    }

    fn list_entries(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(TMP_PREFIX) {
                continue;
            }
            let is_dir = entry.file_type()?.is_dir();
            out.push(DirEntry { name, is_dir });
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn make_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn write_replaces_and_leaves_no_tmp_files() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsStorage::new();
        let p = dir.path().join("a.bin");

        fs.write_all(&p, b"one").unwrap();
        fs.write_all(&p, b"two").unwrap();

        assert_eq!(fs.read_all(&p).unwrap(), b"two");
        let names: Vec<_> = fs.list_entries(dir.path()).unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a.bin".to_string()]);
    }

    #[test]
    fn tmp_name_does_not_grow_with_target_name() {
        let fs = FsStorage::new();
        let long = "a".repeat(250);
        let tmp = fs.tmp_path_for(Path::new("/d").join(&long).as_path());
        assert_eq!(tmp.parent(), Some(Path::new("/d")));
        let name = tmp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(TMP_PREFIX));
        assert!(name.len() < 64, "{name}");
    }

    #[test]
    fn listing_hides_in_flight_tmp_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{TMP_PREFIX}1-0")), b"partial").unwrap();
        std::fs::write(dir.path().join("x"), b"done").unwrap();

        let entries = FsStorage::new().list_entries(dir.path()).unwrap();
        assert_eq!(entries, vec![DirEntry { name: "x".into(), is_dir: false }]);
    }

    #[test]
    fn missing_paths_report_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = FsStorage::new();
        let gone = dir.path().join("gone");

        assert_eq!(fs.read_all(&gone).unwrap_err().kind(), io::ErrorKind::NotFound);
        assert_eq!(fs.list_entries(&gone).unwrap_err().kind(), io::ErrorKind::NotFound);
        assert_eq!(fs.remove(&gone).unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
