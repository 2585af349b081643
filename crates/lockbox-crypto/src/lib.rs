//! lockbox-crypto: symmetric encryption core
//!
//! AES-CBC with PKCS7 padding over caller-supplied byte buffers, key/IV
//! material either given directly, taken from the built-in defaults, or
//! derived from a password via PBKDF2-HMAC-SHA1.
//!
//! ```text
//! password + salt ──PBKDF2(1000, SHA-1)──▶ 48 bytes ─▶ key[0..32] ++ iv[32..48]
//! plaintext ──AES-CBC + PKCS7──▶ ciphertext (len % 16 == 0)
//! ```
//!
//! There is no authentication tag: decryption with the wrong key usually
//! fails padding validation, but CBC alone cannot guarantee it always does.

pub mod detect;
pub mod engine;
pub mod kdf;
pub mod material;

pub use detect::{is_file_encrypted, looks_encrypted};
pub use engine::{decrypt, encrypt, BlockDecryptor, BlockEncryptor};
pub use kdf::derive_key_material;
pub use material::KeyMaterial;

/// AES block size in bytes, regardless of key length.
pub const BLOCK_SIZE: usize = 16;

/// Size of a CBC initialization vector (one block).
pub const IV_SIZE: usize = 16;

/// Size of the PBKDF2 salt in bytes.
pub const SALT_SIZE: usize = 16;

/// Accepted AES key lengths (AES-128/192/256).
pub const KEY_SIZES: [usize; 3] = [16, 24, 32];
