//! MD5 file checksums, rendered as 32 uppercase hex characters
//!
//! Checksums depend only on byte content, never on the filename, so
//! they survive renames and the encrypt/decrypt filename rewriting.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lockbox_core::{LockboxError, LockboxResult};
use md5::{Digest, Md5};
use tracing::debug;

use crate::CHECKSUM_LEN;

/// Compute the MD5 checksum of a file's contents.
///
/// The file is streamed through the digest, not loaded whole.
pub fn compute_checksum<P: AsRef<Path>>(path: P) -> LockboxResult<String> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(LockboxError::InvalidArgument("path is empty".to_string()));
    }
    if !path.exists() {
        return Err(LockboxError::NotFound(path.to_path_buf()));
    }

    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let checksum = hex::encode_upper(hasher.finalize());
    debug!(path = %path.display(), checksum, "computed checksum");
    Ok(checksum)
}

/// Whether two files have identical contents (digest equality; the
/// filenames play no part).
pub fn compare_files<P: AsRef<Path>, Q: AsRef<Path>>(a: P, b: Q) -> LockboxResult<bool> {
    Ok(compute_checksum(a)? == compute_checksum(b)?)
}

/// Check a file against an expected checksum.
///
/// The checksum must be non-empty and exactly 32 characters; it is
/// uppercased before comparison, so lowercase hex is accepted.
pub fn check_file<P: AsRef<Path>>(path: P, checksum: &str) -> LockboxResult<bool> {
    if checksum.is_empty() {
        return Err(LockboxError::InvalidArgument(
            "checksum is empty".to_string(),
        ));
    }
    if checksum.len() != CHECKSUM_LEN {
        return Err(LockboxError::InvalidArgument(format!(
            "checksum must be {CHECKSUM_LEN} characters, got {}",
            checksum.len()
        )));
    }
    Ok(compute_checksum(path)? == checksum.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // MD5("hello world\n") — classic known-answer value.
    const HELLO_MD5: &str = "6F5902AC237024BDD0C176CB93063DC4";

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_known_answer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hello.txt", b"hello world\n");
        assert_eq!(compute_checksum(&path).unwrap(), HELLO_MD5);
    }

    #[test]
    fn test_checksum_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "any.bin", &[0u8, 1, 2, 3, 255]);
        let checksum = compute_checksum(&path).unwrap();
        assert_eq!(checksum.len(), CHECKSUM_LEN);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_checksum_ignores_filename() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "first-name.txt", b"identical bytes");
        let b = write_file(dir.path(), "second-name.dat", b"identical bytes");
        assert_eq!(
            compute_checksum(&a).unwrap(),
            compute_checksum(&b).unwrap()
        );
        assert!(compare_files(&a, &b).unwrap());
    }

    #[test]
    fn test_compare_differing_content() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"one content");
        let b = write_file(dir.path(), "b.txt", b"another content");
        assert!(!compare_files(&a, &b).unwrap());
    }

    #[test]
    fn test_check_file_accepts_lowercase() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hello.txt", b"hello world\n");
        assert!(check_file(&path, HELLO_MD5).unwrap());
        assert!(check_file(&path, &HELLO_MD5.to_ascii_lowercase()).unwrap());
    }

    #[test]
    fn test_check_file_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "hello.txt", b"not the hello file");
        assert!(!check_file(&path, HELLO_MD5).unwrap());
    }

    #[test]
    fn test_check_file_rejects_short_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "x.txt", b"x");
        assert!(matches!(
            check_file(&path, "short"),
            Err(LockboxError::InvalidArgument(_))
        ));
        assert!(matches!(
            check_file(&path, ""),
            Err(LockboxError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = compute_checksum("/no/such/file.bin");
        assert!(matches!(result, Err(LockboxError::NotFound(_))));
    }

    #[test]
    fn test_empty_path() {
        assert!(matches!(
            compute_checksum(""),
            Err(LockboxError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_empty_file_checksum() {
        // MD5 of empty input is the well-known d41d8... digest.
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "empty.bin", b"");
        assert_eq!(
            compute_checksum(&path).unwrap(),
            "D41D8CD98F00B204E9800998ECF8427E"
        );
    }
}
