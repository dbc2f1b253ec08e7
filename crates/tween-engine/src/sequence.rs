//! Loading a folder of sidecars into a capture-ordered sequence

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use xmp_sidecar::SIDECAR_EXTENSION;

use crate::error::{Result, TweenError};
use crate::record::PhotoRecord;

/// Sidecar files directly inside `folder`, sorted by file name.
pub fn sidecar_paths(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder).map_err(|e| TweenError::io(folder, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| TweenError::io(folder, e))?.path();
        let is_sidecar = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(SIDECAR_EXTENSION))
            .unwrap_or(false);

        if is_sidecar && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Load every sidecar in `folder` and order the records by capture time.
///
/// Any unreadable file or missing timestamp aborts the whole load.
pub fn load_folder(folder: &Path) -> Result<Vec<PhotoRecord>> {
    let paths = sidecar_paths(folder)?;
    info!(folder = %folder.display(), files = paths.len(), "loading sidecars");

    let mut records = paths
        .iter()
        .map(|path| {
            debug!(file = %path.display(), "loading");
            PhotoRecord::load(path)
        })
        .collect::<Result<Vec<_>>>()?;

    sort_by_capture_time(&mut records);
    Ok(records)
}

/// Stable sort by capture time: frames sharing a timestamp keep their
/// incoming (file name) order.
pub fn sort_by_capture_time(records: &mut [PhotoRecord]) {
    records.sort_by_key(|r| r.capture_time());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record_text;

    #[test]
    fn test_load_folder_sorts_by_capture_time() {
        let dir = tempfile::tempdir().unwrap();
        // File names deliberately out of capture order
        fs::write(dir.path().join("a.xmp"), record_text(600, "1/250", "8", &[])).unwrap();
        fs::write(dir.path().join("b.XMP"), record_text(0, "1/250", "8", &[])).unwrap();
        fs::write(dir.path().join("c.xmp"), record_text(300, "1/250", "8", &[])).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a sidecar").unwrap();

        let records = load_folder(dir.path()).unwrap();
        let offsets: Vec<i64> = records
            .iter()
            .map(|r| r.seconds_since(&records[0]))
            .collect();
        assert_eq!(offsets, vec![0, 300, 600]);
    }

    #[test]
    fn test_identical_timestamps_keep_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = record_text(0, "1/250", "8", &[]).replace("DSC_0000", "first");
        let second = record_text(0, "1/250", "8", &[]).replace("DSC_0000", "second");
        fs::write(dir.path().join("2.xmp"), second).unwrap();
        fs::write(dir.path().join("1.xmp"), first).unwrap();

        let records = load_folder(dir.path()).unwrap();
        assert_eq!(records[0].output_file_name().unwrap(), "first.xmp");
        assert_eq!(records[1].output_file_name().unwrap(), "second.xmp");
    }

    #[test]
    fn test_bad_file_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xmp"), record_text(0, "1/250", "8", &[])).unwrap();
        fs::write(
            dir.path().join("b.xmp"),
            record_text(5, "1/250", "8", &[]).replace("2012-06-05T21:00:05.00", "?"),
        )
        .unwrap();

        assert!(load_folder(dir.path()).is_err());
    }

    #[test]
    fn test_empty_and_missing_folders() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_folder(dir.path()).unwrap().is_empty());
        assert!(matches!(
            load_folder(&dir.path().join("missing")),
            Err(TweenError::Io { .. })
        ));
    }
}
