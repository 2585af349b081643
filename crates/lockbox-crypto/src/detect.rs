//! Heuristic test for whether a byte blob is already ciphertext
//!
//! AES-CBC output is block-aligned and close to uniform over 0-255.
//! Text files concentrate in printable ASCII, so a single block that
//! contains only printable bytes (plus CR/LF and the UTF-8 BOM bytes)
//! is taken as plaintext. This is a heuristic, not a format marker;
//! short random-looking plaintext can misclassify either way. The
//! thresholds and byte set are wire-compatible and must not change.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use lockbox_core::{LockboxError, LockboxResult};

use crate::BLOCK_SIZE;

// Printable ASCII, CR, LF, or one of the UTF-8 BOM bytes (checked
// individually, not as a sequence).
fn is_plaintext_byte(b: u8) -> bool {
    (32..=127).contains(&b) || matches!(b, 10 | 13 | 0xEF | 0xBB | 0xBF)
}

/// Guess whether data is this scheme's ciphertext.
///
/// `sample` holds the leading bytes of the data (only the first
/// [`BLOCK_SIZE`] are inspected); `total_len` is the full data length.
/// Empty or non-block-aligned data is never ciphertext; otherwise any
/// sampled byte outside the plaintext allow-list classifies the data as
/// encrypted.
pub fn looks_encrypted(sample: &[u8], total_len: u64) -> bool {
    if total_len == 0 {
        return false;
    }
    if total_len % BLOCK_SIZE as u64 != 0 {
        return false;
    }
    sample
        .iter()
        .take(BLOCK_SIZE)
        .any(|&b| !is_plaintext_byte(b))
}

/// Apply [`looks_encrypted`] to a file, reading at most one block.
pub fn is_file_encrypted<P: AsRef<Path>>(path: P) -> LockboxResult<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LockboxError::NotFound(path.to_path_buf()));
    }

    let mut file = File::open(path)?;
    let total_len = file.metadata()?.len();
    if total_len == 0 || total_len % BLOCK_SIZE as u64 != 0 {
        return Ok(false);
    }

    // Block-aligned and non-empty, so at least one full block exists.
    let mut sample = [0u8; BLOCK_SIZE];
    file.read_exact(&mut sample)?;
    Ok(looks_encrypted(&sample, total_len))
}
