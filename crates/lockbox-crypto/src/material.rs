//! Key/IV material for the AES-CBC engine

use lockbox_core::{CipherDefaults, LockboxError, LockboxResult};
use zeroize::Zeroize;

use crate::{IV_SIZE, KEY_SIZES};

/// An AES key plus CBC initialization vector.
///
/// The key must be 16, 24, or 32 bytes (AES-128/192/256) and the IV
/// exactly one block; both are checked at construction so the engine
/// never has to re-validate. Zeroized on drop.
#[derive(Clone)]
pub struct KeyMaterial {
    key: Vec<u8>,
    iv: [u8; IV_SIZE],
}

impl KeyMaterial {
    /// Build key material from explicit key and IV bytes.
    pub fn new(key: &[u8], iv: &[u8]) -> LockboxResult<Self> {
        if !KEY_SIZES.contains(&key.len()) {
            return Err(LockboxError::InvalidArgument(format!(
                "AES key must be 16, 24, or 32 bytes, got {}",
                key.len()
            )));
        }
        if iv.len() != IV_SIZE {
            return Err(LockboxError::InvalidArgument(format!(
                "IV must be {} bytes, got {}",
                IV_SIZE,
                iv.len()
            )));
        }
        let mut iv_bytes = [0u8; IV_SIZE];
        iv_bytes.copy_from_slice(iv);
        Ok(Self {
            key: key.to_vec(),
            iv: iv_bytes,
        })
    }

    /// The built-in default key/IV pair.
    pub fn from_defaults(defaults: &CipherDefaults) -> Self {
        Self {
            key: defaults.key.to_vec(),
            iv: defaults.iv,
        }
    }

    /// Length-validated constructor for callers inside this crate that
    /// already hold correctly sized buffers (the KDF).
    pub(crate) fn from_parts(key: Vec<u8>, iv: [u8; IV_SIZE]) -> Self {
        debug_assert!(KEY_SIZES.contains(&key.len()));
        Self { key, iv }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}
