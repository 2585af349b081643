//! String-level encrypt/decrypt: UTF-8 ↔ AES-CBC ↔ standard Base64

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lockbox_core::{CipherDefaults, LockboxError, LockboxResult};
use lockbox_crypto::{decrypt, derive_key_material, encrypt, KeyMaterial};
use secrecy::SecretString;

fn default_material() -> KeyMaterial {
    KeyMaterial::from_defaults(&CipherDefaults::builtin())
}

fn password_material(password: &SecretString) -> KeyMaterial {
    derive_key_material(password, &CipherDefaults::builtin().salt)
}

fn require_nonempty(text: &str) -> LockboxResult<()> {
    if text.is_empty() {
        return Err(LockboxError::InvalidArgument("text is empty".to_string()));
    }
    Ok(())
}

/// Encrypt a string with explicit key material, returning standard
/// Base64 of the ciphertext.
pub fn encrypt_text_with_key(text: &str, material: &KeyMaterial) -> LockboxResult<String> {
    require_nonempty(text)?;
    Ok(BASE64.encode(encrypt(text.as_bytes(), material)?))
}

/// Encrypt a string with a key/IV pair derived from `password`.
pub fn encrypt_text_with_password(text: &str, password: &SecretString) -> LockboxResult<String> {
    encrypt_text_with_key(text, &password_material(password))
}

/// Encrypt a string with the built-in default key/IV pair.
pub fn encrypt_text(text: &str) -> LockboxResult<String> {
    encrypt_text_with_key(text, &default_material())
}

/// Decrypt a Base64 string with explicit key material.
///
/// Malformed Base64 is [`LockboxError::InvalidArgument`]; a padding
/// failure (wrong key/password, corrupted input) is
/// [`LockboxError::Crypto`]. Decrypted bytes are decoded as UTF-8
/// lossily, so a wrong key that happens to unpad cleanly still yields a
/// (garbage) string rather than a second error kind.
pub fn decrypt_text_with_key(text: &str, material: &KeyMaterial) -> LockboxResult<String> {
    require_nonempty(text)?;
    let ciphertext = BASE64
        .decode(text)
        .map_err(|e| LockboxError::InvalidArgument(format!("malformed Base64: {e}")))?;
    let plaintext = decrypt(&ciphertext, material)?;
    Ok(String::from_utf8_lossy(&plaintext).into_owned())
}

/// Decrypt a Base64 string with a key/IV pair derived from `password`.
pub fn decrypt_text_with_password(text: &str, password: &SecretString) -> LockboxResult<String> {
    decrypt_text_with_key(text, &password_material(password))
}

/// Decrypt a Base64 string with the built-in default key/IV pair.
pub fn decrypt_text(text: &str) -> LockboxResult<String> {
    decrypt_text_with_key(text, &default_material())
}

/// Best-effort decrypt with the default key/IV pair.
///
/// The one place that deliberately swallows heterogeneous failures:
/// malformed Base64, padding failures, anything else all collapse to
/// `None`. Callers that need to distinguish error kinds use
/// [`decrypt_text`] instead.
pub fn try_decrypt_text(text: &str) -> Option<String> {
    decrypt_text(text).ok()
}
