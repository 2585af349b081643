//! Built-in cipher defaults
//!
//! These byte values are wire constants: every file or string encrypted
//! without an explicit key or password used them, so they must never
//! change. Altering any of them breaks decryption of all previously
//! produced ciphertext and invalidates derived keys.

/// Default AES key, IV, and PBKDF2 salt, exposed as one explicitly
/// constructed value rather than loose mutable globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherDefaults {
    /// Default AES-256 key (32 bytes).
    pub key: [u8; 32],
    /// Default CBC initialization vector (16 bytes).
    pub iv: [u8; 16],
    /// PBKDF2 salt for password-derived keys (16 bytes).
    pub salt: [u8; 16],
}

impl CipherDefaults {
    /// The built-in constants shipped with the library.
    pub const fn builtin() -> Self {
        Self {
            key: [
                0x3A, 0xF2, 0x9C, 0x71, 0xB4, 0xE5, 0x08, 0x6D, 0x1F, 0xC9,
                0x87, 0x52, 0xAB, 0x34, 0xD0, 0xFE, 0x46, 0xA1, 0x2B, 0xC3,
                0x9E, 0x78, 0x14, 0x60, 0xDF, 0x05, 0xBB, 0x29, 0x6F, 0x93,
                0xED, 0x0A,
            ],
            iv: [
                0x67, 0x34, 0xBF, 0x7D, 0x98, 0x0A, 0x2D, 0x43, 0xC4, 0xEB,
                0x81, 0x45, 0x4F, 0x4B, 0xB7, 0x1D,
            ],
            salt: [
                0xFA, 0x83, 0x29, 0x01, 0x5B, 0x7E, 0x4C, 0x9A, 0x3D, 0x18,
                0xEF, 0x62, 0xCA, 0x07, 0x9D, 0x55,
            ],
        }
    }
}

impl Default for CipherDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lengths() {
        let defaults = CipherDefaults::builtin();
        assert_eq!(defaults.key.len(), 32);
        assert_eq!(defaults.iv.len(), 16);
        assert_eq!(defaults.salt.len(), 16);
    }

    #[test]
    fn test_builtin_is_stable() {
        // Spot checks against the published constants. If one of these
        // fails, interop with existing ciphertext is broken.
        let defaults = CipherDefaults::builtin();
        assert_eq!(defaults.key[0], 0x3A);
        assert_eq!(defaults.key[31], 0x0A);
        assert_eq!(defaults.iv[0], 0x67);
        assert_eq!(defaults.iv[15], 0x1D);
        assert_eq!(defaults.salt[0], 0xFA);
        assert_eq!(defaults.salt[15], 0x55);
    }

    #[test]
    fn test_default_matches_builtin() {
        assert_eq!(CipherDefaults::default(), CipherDefaults::builtin());
    }
}
