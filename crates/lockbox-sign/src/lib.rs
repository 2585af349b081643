//! lockbox-sign: content fingerprints and check digits
//!
//! MD5 checksums for file equality/integrity checks (not a security
//! boundary — MD5 here fingerprints content, it does not authenticate
//! it), and a Luhn check-digit algorithm generalized to bases 2, 8, 10,
//! and 16.

pub mod checksum;
pub mod luhn;

pub use checksum::{check_file, compare_files, compute_checksum};
pub use luhn::{check_number, compute_check_digit};

/// Length of a rendered MD5 checksum (32 uppercase hex characters).
pub const CHECKSUM_LEN: usize = 32;
