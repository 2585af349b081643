//! Key derivation: PBKDF2-HMAC-SHA1 password → key/IV pair

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;
use zeroize::Zeroize;

use crate::material::KeyMaterial;
use crate::{IV_SIZE, SALT_SIZE};

/// PBKDF2 iteration count. Pinned (never a library default) so the file
/// and text paths can never derive diverging material for one password.
pub const PBKDF2_ITERATIONS: u32 = 1000;

const DERIVED_LEN: usize = 32 + IV_SIZE;

/// Derive a 32-byte AES key and 16-byte IV from a password and salt.
///
/// Runs one PBKDF2-HMAC-SHA1 derivation of 48 bytes and splits it:
/// bytes 0..32 become the key, 32..48 the IV. The split order matters
/// for round-trip compatibility with existing ciphertext, which was
/// produced by two sequential reads from the same derived byte stream.
///
/// Deterministic; an empty password is permitted and yields a fixed key.
pub fn derive_key_material(password: &SecretString, salt: &[u8; SALT_SIZE]) -> KeyMaterial {
    let mut okm = [0u8; DERIVED_LEN];
    pbkdf2_hmac::<Sha1>(
        password.expose_secret().as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut okm,
    );

    let key = okm[..32].to_vec();
    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&okm[32..]);
    okm.zeroize();

    KeyMaterial::from_parts(key, iv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::CipherDefaults;

    fn salt() -> [u8; SALT_SIZE] {
        CipherDefaults::builtin().salt
    }

    #[test]
    fn test_kdf_deterministic() {
        let m1 = derive_key_material(&SecretString::from("hunter2"), &salt());
        let m2 = derive_key_material(&SecretString::from("hunter2"), &salt());
        assert_eq!(m1.key(), m2.key(), "KDF must be deterministic");
        assert_eq!(m1.iv(), m2.iv());
    }

    #[test]
    fn test_kdf_different_passwords() {
        let m1 = derive_key_material(&SecretString::from("password-a"), &salt());
        let m2 = derive_key_material(&SecretString::from("password-b"), &salt());
        assert_ne!(
            m1.key(),
            m2.key(),
            "different passwords must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let m1 = derive_key_material(&SecretString::from("same"), &[1u8; SALT_SIZE]);
        let m2 = derive_key_material(&SecretString::from("same"), &[2u8; SALT_SIZE]);
        assert_ne!(m1.key(), m2.key());
    }

    #[test]
    fn test_kdf_output_shape() {
        let material = derive_key_material(&SecretString::from("shape"), &salt());
        assert_eq!(material.key().len(), 32);
        assert_eq!(material.iv().len(), IV_SIZE);
    }

    #[test]
    fn test_kdf_key_and_iv_come_from_one_stream() {
        // The IV must be bytes 32..48 of the same 48-byte derivation,
        // not a second independent run. A fresh 48-byte derivation
        // therefore reproduces both halves.
        let mut okm = [0u8; DERIVED_LEN];
        pbkdf2_hmac::<Sha1>(b"stream-check", &salt(), PBKDF2_ITERATIONS, &mut okm);

        let material = derive_key_material(&SecretString::from("stream-check"), &salt());
        assert_eq!(material.key(), &okm[..32]);
        assert_eq!(&material.iv()[..], &okm[32..]);
    }

    #[test]
    fn test_kdf_empty_password_is_fixed() {
        let m1 = derive_key_material(&SecretString::from(""), &salt());
        let m2 = derive_key_material(&SecretString::from(""), &salt());
        assert_eq!(m1.key(), m2.key());
    }
}
