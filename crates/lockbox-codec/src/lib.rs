//! lockbox-codec: file- and string-level encryption protocols
//!
//! Sits on top of lockbox-crypto and adds the orchestration the raw
//! engine deliberately does not have:
//!
//! - file encrypt/decrypt with the `"<stem>.<ext>"` ⇄
//!   `"<stem>_<ext>.crypt"` filename convention, whole-file transform,
//!   and rollback of partial output on write failure
//! - incremental stream wrappers ([`CipherWriter`]/[`CipherReader`])
//!   that produce byte-identical output to the buffered path
//! - text encrypt/decrypt over UTF-8 and standard Base64

pub mod file;
pub mod stream;
pub mod text;

pub use file::{
    decrypt_file, decrypt_file_with_key, decrypt_file_with_password, encrypt_file,
    encrypt_file_with_key, encrypt_file_with_password, encrypted_path, open_input,
    open_input_with_key, open_output, open_output_with_key, restored_path, FileSink, FileSource,
    CRYPT_EXTENSION,
};
pub use stream::{CipherReader, CipherWriter};
pub use text::{
    decrypt_text, decrypt_text_with_key, decrypt_text_with_password, encrypt_text,
    encrypt_text_with_key, encrypt_text_with_password, try_decrypt_text,
};
