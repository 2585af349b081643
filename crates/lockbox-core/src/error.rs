use std::path::PathBuf;

use thiserror::Error;

pub type LockboxResult<T> = Result<T, LockboxError>;

#[derive(Debug, Error)]
pub enum LockboxError {
    /// Bad caller input: empty path or text, malformed checksum/Base64,
    /// unsupported modulus, decrypt target without a `.crypt` extension.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Padding/validation failure during decryption: wrong key, wrong
    /// password, or corrupted ciphertext. CBC without an authentication
    /// tag cannot guarantee this fires on every wrong key.
    #[error("cryptographic failure: {0}")]
    Crypto(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
