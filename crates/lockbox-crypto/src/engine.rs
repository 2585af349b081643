//! AES-CBC/PKCS7 transforms
//!
//! One-shot `encrypt`/`decrypt` over byte buffers, plus incremental
//! per-block transforms (`BlockEncryptor`/`BlockDecryptor`) for stream
//! wrappers. AES width (128/192/256) is picked from the key length.
//!
//! No authentication tag is computed: a wrong key almost always trips
//! PKCS7 validation on decrypt, but CBC alone cannot guarantee it. That
//! limitation is inherent to the format and is surfaced, not masked.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, InvalidLength, KeyIvInit};
use aes::Block;
use lockbox_core::{LockboxError, LockboxResult};

use crate::material::KeyMaterial;
use crate::BLOCK_SIZE;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes192CbcDec = cbc::Decryptor<aes::Aes192>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

fn init_error(e: InvalidLength) -> LockboxError {
    // KeyMaterial validates lengths at construction, so this only fires
    // if that invariant is broken.
    LockboxError::Crypto(format!("cipher init failed: {e}"))
}

/// Encrypt a byte buffer with AES-CBC and PKCS7 padding.
///
/// Pure transform: deterministic for a given key/IV/plaintext, no
/// filesystem or global-state side effects. Output length is always a
/// positive multiple of [`BLOCK_SIZE`].
pub fn encrypt(plaintext: &[u8], material: &KeyMaterial) -> LockboxResult<Vec<u8>> {
    let key = material.key();
    let iv = material.iv();
    let ciphertext = match key.len() {
        16 => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(init_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(init_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        _ => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(init_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };
    Ok(ciphertext)
}

/// Decrypt an AES-CBC/PKCS7 buffer.
///
/// Fails with [`LockboxError::Crypto`] when the input is not a positive
/// multiple of the block size or when padding validation fails (wrong
/// key, wrong password, or corrupted ciphertext).
pub fn decrypt(ciphertext: &[u8], material: &KeyMaterial) -> LockboxResult<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(LockboxError::Crypto(format!(
            "ciphertext length {} is not a positive multiple of the {}-byte block size",
            ciphertext.len(),
            BLOCK_SIZE
        )));
    }

    let key = material.key();
    let iv = material.iv();
    let result = match key.len() {
        16 => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(init_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        24 => Aes192CbcDec::new_from_slices(key, iv)
            .map_err(init_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        _ => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(init_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    };

    result.map_err(|_| {
        LockboxError::Crypto(
            "padding validation failed: wrong key, wrong password, or corrupted ciphertext"
                .to_string(),
        )
    })
}

enum Enc {
    Aes128(Aes128CbcEnc),
    Aes192(Aes192CbcEnc),
    Aes256(Aes256CbcEnc),
}

enum Dec {
    Aes128(Aes128CbcDec),
    Aes192(Aes192CbcDec),
    Aes256(Aes256CbcDec),
}

/// Incremental AES-CBC encryptor operating on whole blocks.
///
/// Padding is the caller's job (the stream wrappers apply PKCS7 to the
/// final block); this type only chains and encrypts 16-byte blocks in
/// order. Feeding the same blocks through this and [`encrypt`] yields
/// byte-identical ciphertext.
pub struct BlockEncryptor(Enc);

impl BlockEncryptor {
    pub fn new(material: &KeyMaterial) -> LockboxResult<Self> {
        let key = material.key();
        let iv = material.iv();
        let inner = match key.len() {
            16 => Enc::Aes128(Aes128CbcEnc::new_from_slices(key, iv).map_err(init_error)?),
            24 => Enc::Aes192(Aes192CbcEnc::new_from_slices(key, iv).map_err(init_error)?),
            _ => Enc::Aes256(Aes256CbcEnc::new_from_slices(key, iv).map_err(init_error)?),
        };
        Ok(Self(inner))
    }

    /// Encrypt one block in place.
    pub fn encrypt_block(&mut self, block: &mut [u8; BLOCK_SIZE]) {
        let block = Block::from_mut_slice(block);
        match &mut self.0 {
            Enc::Aes128(c) => c.encrypt_block_mut(block),
            Enc::Aes192(c) => c.encrypt_block_mut(block),
            Enc::Aes256(c) => c.encrypt_block_mut(block),
        }
    }
}

/// Incremental AES-CBC decryptor operating on whole blocks.
///
/// Unpadding is the caller's job; see [`BlockEncryptor`].
pub struct BlockDecryptor(Dec);

impl BlockDecryptor {
    pub fn new(material: &KeyMaterial) -> LockboxResult<Self> {
        let key = material.key();
        let iv = material.iv();
        let inner = match key.len() {
            16 => Dec::Aes128(Aes128CbcDec::new_from_slices(key, iv).map_err(init_error)?),
            24 => Dec::Aes192(Aes192CbcDec::new_from_slices(key, iv).map_err(init_error)?),
            _ => Dec::Aes256(Aes256CbcDec::new_from_slices(key, iv).map_err(init_error)?),
        };
        Ok(Self(inner))
    }

    /// Decrypt one block in place.
    pub fn decrypt_block(&mut self, block: &mut [u8; BLOCK_SIZE]) {
        let block = Block::from_mut_slice(block);
        match &mut self.0 {
            Dec::Aes128(c) => c.decrypt_block_mut(block),
            Dec::Aes192(c) => c.decrypt_block_mut(block),
            Dec::Aes256(c) => c.decrypt_block_mut(block),
        }
    }
}
