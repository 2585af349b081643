//! File-level encrypt/decrypt orchestration
//!
//! Filename convention (wire-compatible, do not change):
//!
//! ```text
//! encrypt:  "<stem>.<ext>"        → "<stem>_<ext>.crypt"
//! decrypt:  "<stem>_<ext>.crypt"  → "<stem>.<ext>"
//! ```
//!
//! Both directions read the whole input, transform it, write the new
//! file, then delete the source. A failed write removes the partial
//! output before the error is returned, so callers never observe a
//! half-written file as success. A failed source delete after a
//! complete write propagates as-is.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use lockbox_core::{CipherDefaults, LockboxError, LockboxResult};
use lockbox_crypto::{
    decrypt, derive_key_material, encrypt, is_file_encrypted, KeyMaterial,
};
use secrecy::SecretString;
use tracing::{debug, warn};

use crate::stream::{CipherReader, CipherWriter};

/// Extension carried by encrypted files, including the dot.
pub const CRYPT_EXTENSION: &str = ".crypt";

fn default_material() -> KeyMaterial {
    KeyMaterial::from_defaults(&CipherDefaults::builtin())
}

fn password_material(password: &SecretString) -> KeyMaterial {
    derive_key_material(password, &CipherDefaults::builtin().salt)
}

fn path_str(path: &Path) -> LockboxResult<&str> {
    path.to_str()
        .ok_or_else(|| LockboxError::InvalidArgument("path is not valid UTF-8".to_string()))
}

fn require_nonempty(path: &Path) -> LockboxResult<()> {
    if path.as_os_str().is_empty() {
        return Err(LockboxError::InvalidArgument("path is empty".to_string()));
    }
    Ok(())
}

fn require_exists(path: &Path) -> LockboxResult<()> {
    if !path.exists() {
        return Err(LockboxError::NotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Target path for encrypting `path`: `"<stem>.<ext>"` →
/// `"<stem>_<ext>.crypt"`, splitting on the *last* dot.
pub fn encrypted_path<P: AsRef<Path>>(path: P) -> LockboxResult<PathBuf> {
    let s = path_str(path.as_ref())?;
    let dot = s.rfind('.').ok_or_else(|| {
        LockboxError::InvalidArgument(format!("path {s:?} has no extension to rewrite"))
    })?;
    Ok(PathBuf::from(format!(
        "{}_{}{}",
        &s[..dot],
        &s[dot + 1..],
        CRYPT_EXTENSION
    )))
}

/// Original path restored from an encrypted one:
/// `"<stem>_<ext>.crypt"` → `"<stem>.<ext>"`, splitting on the last
/// underscore. Rejects paths that do not end in `.crypt`.
pub fn restored_path<P: AsRef<Path>>(path: P) -> LockboxResult<PathBuf> {
    let s = path_str(path.as_ref())?;
    if !s.ends_with(CRYPT_EXTENSION) {
        return Err(LockboxError::InvalidArgument(format!(
            "not a {CRYPT_EXTENSION} file: {s:?}"
        )));
    }
    let dot = s.len() - CRYPT_EXTENSION.len();
    let underscore = s.rfind('_').ok_or_else(|| {
        LockboxError::InvalidArgument(format!(
            "path {s:?} has no underscore to restore an extension from"
        ))
    })?;
    Ok(PathBuf::from(format!(
        "{}.{}",
        &s[..underscore],
        &s[underscore + 1..dot]
    )))
}

/// Write the transformed bytes, then delete the source. On write
/// failure the partial output is removed and the error re-raised; the
/// source is left untouched.
fn replace_file(source: &Path, target: &Path, bytes: &[u8]) -> LockboxResult<()> {
    if let Err(e) = fs::write(target, bytes) {
        warn!(
            target_path = %target.display(),
            error = %e,
            "write failed, removing partial output"
        );
        let _ = fs::remove_file(target);
        return Err(e.into());
    }
    fs::remove_file(source)?;
    debug!(
        source = %source.display(),
        target = %target.display(),
        "file replaced"
    );
    Ok(())
}

/// Encrypt a file in place with explicit key material.
///
/// The input is replaced by its `.crypt` counterpart; see the module
/// docs for the naming rule and failure discipline.
pub fn encrypt_file_with_key<P: AsRef<Path>>(path: P, material: &KeyMaterial) -> LockboxResult<()> {
    let path = path.as_ref();
    require_nonempty(path)?;
    require_exists(path)?;

    let target = encrypted_path(path)?;
    let plaintext = fs::read(path)?;
    let ciphertext = encrypt(&plaintext, material)?;
    replace_file(path, &target, &ciphertext)
}

/// Encrypt a file with a key/IV pair derived from `password`.
pub fn encrypt_file_with_password<P: AsRef<Path>>(
    path: P,
    password: &SecretString,
) -> LockboxResult<()> {
    encrypt_file_with_key(path, &password_material(password))
}

/// Encrypt a file with the built-in default key/IV pair.
pub fn encrypt_file<P: AsRef<Path>>(path: P) -> LockboxResult<()> {
    encrypt_file_with_key(path, &default_material())
}

/// Decrypt a `.crypt` file in place with explicit key material.
///
/// The `.crypt` extension is required and checked before any I/O. A
/// wrong key or password surfaces as [`LockboxError::Crypto`] (with the
/// CBC caveat: not guaranteed on every wrong key).
pub fn decrypt_file_with_key<P: AsRef<Path>>(path: P, material: &KeyMaterial) -> LockboxResult<()> {
    let path = path.as_ref();
    require_nonempty(path)?;
    let target = restored_path(path)?;
    require_exists(path)?;

    let ciphertext = fs::read(path)?;
    let plaintext = decrypt(&ciphertext, material)?;
    replace_file(path, &target, &plaintext)
}

/// Decrypt a `.crypt` file with a key/IV pair derived from `password`.
pub fn decrypt_file_with_password<P: AsRef<Path>>(
    path: P,
    password: &SecretString,
) -> LockboxResult<()> {
    decrypt_file_with_key(path, &password_material(password))
}

/// Decrypt a `.crypt` file with the built-in default key/IV pair.
pub fn decrypt_file<P: AsRef<Path>>(path: P) -> LockboxResult<()> {
    decrypt_file_with_key(path, &default_material())
}

/// Output stream for a new file, either plain or encrypting.
///
/// [`finish`](Self::finish) must be called on the encrypting variant to
/// emit the final padding block.
pub enum FileSink {
    Plain(File),
    Encrypted(CipherWriter<File>),
}

impl FileSink {
    /// Complete the stream: pad-and-flush for the encrypting variant,
    /// plain flush otherwise.
    pub fn finish(self) -> io::Result<()> {
        match self {
            FileSink::Plain(mut f) => f.flush(),
            FileSink::Encrypted(w) => w.finish().map(|_| ()),
        }
    }
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileSink::Plain(f) => f.write(buf),
            FileSink::Encrypted(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileSink::Plain(f) => f.flush(),
            FileSink::Encrypted(w) => w.flush(),
        }
    }
}

/// Input stream over an existing file, either plain or decrypting.
/// Dropping mid-read is always clean.
pub enum FileSource {
    Plain(File),
    Encrypted(CipherReader<File>),
}

impl Read for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            FileSource::Plain(f) => f.read(buf),
            FileSource::Encrypted(r) => r.read(buf),
        }
    }
}

/// Create an output file stream that encrypts with explicit key
/// material as bytes are written.
pub fn open_output_with_key<P: AsRef<Path>>(
    path: P,
    material: &KeyMaterial,
) -> LockboxResult<FileSink> {
    let path = path.as_ref();
    require_nonempty(path)?;
    let file = File::create(path)?;
    Ok(FileSink::Encrypted(CipherWriter::new(file, material)?))
}

/// Create an output file stream, encrypting with the default key/IV
/// pair when `encrypt_output` is set.
pub fn open_output<P: AsRef<Path>>(path: P, encrypt_output: bool) -> LockboxResult<FileSink> {
    let path = path.as_ref();
    if encrypt_output {
        open_output_with_key(path, &default_material())
    } else {
        require_nonempty(path)?;
        Ok(FileSink::Plain(File::create(path)?))
    }
}

/// Open a file for reading, decrypting with explicit key material.
pub fn open_input_with_key<P: AsRef<Path>>(
    path: P,
    material: &KeyMaterial,
) -> LockboxResult<FileSource> {
    let path = path.as_ref();
    require_nonempty(path)?;
    require_exists(path)?;
    let file = File::open(path)?;
    Ok(FileSource::Encrypted(CipherReader::new(file, material)?))
}

/// Open a file for reading, consulting the ciphertext heuristic: a file
/// that looks encrypted is wrapped in a decrypting reader using the
/// default key/IV pair, anything else is read as-is.
pub fn open_input<P: AsRef<Path>>(path: P) -> LockboxResult<FileSource> {
    let path = path.as_ref();
    require_nonempty(path)?;
    require_exists(path)?;

    if is_file_encrypted(path)? {
        open_input_with_key(path, &default_material())
    } else {
        Ok(FileSource::Plain(File::open(path)?))
    }
}
