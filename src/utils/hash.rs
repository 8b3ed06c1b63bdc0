//! SHA-256 digests of written report pages.
//!
//! Every page is hashed right after it is written and the digest goes into
//! `run_summary.json`. An analyst who later re-hashes a page can show it is
//! byte-for-byte what the run produced, which matters once the reports are
//! handed on as evidence.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex SHA-256 of the report at `path`.
///
/// Pages over `max_size_mb` and paths that are not regular files yield
/// `Ok(None)`; the run summary then records the page without a digest.
pub fn report_sha256(path: &Path, max_size_mb: u64) -> io::Result<Option<String>> {
    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() || metadata.len() > max_size_mb * 1024 * 1024 {
        return Ok(None);
    }

    let mut hasher = Sha256::new();
    io::copy(&mut BufReader::new(File::open(path)?), &mut hasher)?;
    Ok(Some(hex_digest(hasher)))
}

/// Whether the page at `path` still has the digest recorded for it
pub fn report_unchanged(path: &Path, recorded: &str, max_size_mb: u64) -> io::Result<bool> {
    Ok(report_sha256(path, max_size_mb)?.is_some_and(|digest| digest.eq_ignore_ascii_case(recorded)))
}

fn hex_digest(hasher: Sha256) -> String {
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_known_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.html");
        fs::write(&path, "abc").unwrap();

        assert_eq!(
            report_sha256(&path, 1).unwrap().as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
    }

    #[test]
    fn test_directory_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(report_sha256(temp_dir.path(), 1).unwrap(), None);
    }

    #[test]
    fn test_oversized_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big.html");
        fs::write(&path, vec![b'x'; 1024 * 1024 + 1]).unwrap();
        assert_eq!(report_sha256(&path, 1).unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(report_sha256(&temp_dir.path().join("absent.html"), 1).is_err());
    }

    #[test]
    fn test_edited_page_no_longer_matches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Logon_Report.html");
        fs::write(&path, "<p>root logged in</p>").unwrap();
        let recorded = report_sha256(&path, 1).unwrap().unwrap();

        assert!(report_unchanged(&path, &recorded, 1).unwrap());
        assert!(report_unchanged(&path, &recorded.to_uppercase(), 1).unwrap());

        fs::write(&path, "<p>nobody logged in</p>").unwrap();
        assert!(!report_unchanged(&path, &recorded, 1).unwrap());
    }
}
