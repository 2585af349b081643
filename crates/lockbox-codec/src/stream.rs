//! Incremental AES-CBC stream wrappers
//!
//! For callers that want to avoid buffering whole files. Both wrappers
//! are bit-compatible with the one-shot engine: encrypting a byte
//! sequence through [`CipherWriter`] produces exactly the bytes
//! `engine::encrypt` would, and [`CipherReader`] accepts them back.
//!
//! The reader explicitly supports partial reads followed by drop: no
//! state is flushed on drop, so abandoning a half-read stream never
//! raises (this replaces a legacy workaround for crypto streams that
//! threw when closed mid-read).

use std::io::{self, Read, Write};

use lockbox_core::LockboxResult;
use lockbox_crypto::{BlockDecryptor, BlockEncryptor, KeyMaterial, BLOCK_SIZE};

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Encrypting writer: buffers to block boundaries, encrypts full blocks
/// as they form, and applies PKCS7 padding in [`finish`](Self::finish).
///
/// `finish` must be called to emit the padding block; dropping the
/// writer without it leaves the output truncated and undecryptable.
pub struct CipherWriter<W: Write> {
    inner: W,
    encryptor: BlockEncryptor,
    pending: Vec<u8>,
}

impl<W: Write> CipherWriter<W> {
    pub fn new(inner: W, material: &KeyMaterial) -> LockboxResult<Self> {
        Ok(Self {
            inner,
            encryptor: BlockEncryptor::new(material)?,
            pending: Vec::with_capacity(BLOCK_SIZE),
        })
    }

    fn write_block(&mut self, mut block: [u8; BLOCK_SIZE]) -> io::Result<()> {
        self.encryptor.encrypt_block(&mut block);
        self.inner.write_all(&block)
    }

    /// Pad, encrypt, and write the final block, then flush and return
    /// the underlying writer.
    ///
    /// PKCS7 always emits padding, so block-aligned input (including an
    /// empty stream) produces one extra block of `0x10` bytes.
    pub fn finish(mut self) -> io::Result<W> {
        let pad = (BLOCK_SIZE - self.pending.len()) as u8;
        let mut block = [pad; BLOCK_SIZE];
        block[..self.pending.len()].copy_from_slice(&self.pending);
        self.write_block(block)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for CipherWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;

        // Top up a partial block left over from the previous write.
        if !self.pending.is_empty() {
            let take = rest.len().min(BLOCK_SIZE - self.pending.len());
            self.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.pending.len() == BLOCK_SIZE {
                let mut block = [0u8; BLOCK_SIZE];
                block.copy_from_slice(&self.pending);
                self.pending.clear();
                self.write_block(block)?;
            }
        }

        let mut chunks = rest.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.write_block(block)?;
        }
        self.pending.extend_from_slice(chunks.remainder());

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Only complete blocks have been written; the partial tail waits
        // for finish().
        self.inner.flush()
    }
}

/// Decrypting reader: decrypts block by block, withholding the latest
/// block until the next one arrives so the true final block can have
/// its PKCS7 padding validated and stripped at EOF.
///
/// A source that is empty, not block-aligned, or ends in invalid
/// padding yields an `InvalidData` error from `read`.
pub struct CipherReader<R: Read> {
    inner: R,
    decryptor: BlockDecryptor,
    held: Option<[u8; BLOCK_SIZE]>,
    ready: Vec<u8>,
    ready_pos: usize,
    done: bool,
}

impl<R: Read> CipherReader<R> {
    pub fn new(inner: R, material: &KeyMaterial) -> LockboxResult<Self> {
        Ok(Self {
            inner,
            decryptor: BlockDecryptor::new(material)?,
            held: None,
            ready: Vec::new(),
            ready_pos: 0,
            done: false,
        })
    }

    /// Read exactly one ciphertext block, or None at a clean EOF.
    fn read_block(&mut self) -> io::Result<Option<[u8; BLOCK_SIZE]>> {
        let mut block = [0u8; BLOCK_SIZE];
        let mut filled = 0;
        while filled < BLOCK_SIZE {
            match self.inner.read(&mut block[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        match filled {
            0 => Ok(None),
            BLOCK_SIZE => Ok(Some(block)),
            _ => Err(invalid_data(
                "ciphertext length is not a multiple of the AES block size",
            )),
        }
    }

    fn refill(&mut self) -> io::Result<()> {
        self.ready.clear();
        self.ready_pos = 0;

        while self.ready.is_empty() && !self.done {
            match self.read_block()? {
                Some(mut block) => {
                    self.decryptor.decrypt_block(&mut block);
                    if let Some(prev) = self.held.replace(block) {
                        self.ready.extend_from_slice(&prev);
                    }
                }
                None => {
                    self.done = true;
                    let last = self.held.take().ok_or_else(|| {
                        invalid_data("ciphertext is empty, expected at least one block")
                    })?;
                    let pad = last[BLOCK_SIZE - 1] as usize;
                    if pad == 0 || pad > BLOCK_SIZE {
                        return Err(invalid_data(
                            "padding validation failed: wrong key, wrong password, or corrupted ciphertext",
                        ));
                    }
                    if !last[BLOCK_SIZE - pad..].iter().all(|&b| b as usize == pad) {
                        return Err(invalid_data(
                            "padding validation failed: wrong key, wrong password, or corrupted ciphertext",
                        ));
                    }
                    self.ready.extend_from_slice(&last[..BLOCK_SIZE - pad]);
                }
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for CipherReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.ready_pos == self.ready.len() {
            if self.done {
                return Ok(0);
            }
            self.refill()?;
            if self.ready.is_empty() {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.ready.len() - self.ready_pos);
        buf[..n].copy_from_slice(&self.ready[self.ready_pos..self.ready_pos + n]);
        self.ready_pos += n;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::CipherDefaults;
    use lockbox_crypto::{decrypt, encrypt};

    fn material() -> KeyMaterial {
        KeyMaterial::from_defaults(&CipherDefaults::builtin())
    }

    fn write_through(content: &[u8], chunk: usize) -> Vec<u8> {
        let mut writer = CipherWriter::new(Vec::new(), &material()).unwrap();
        for piece in content.chunks(chunk.max(1)) {
            writer.write_all(piece).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_writer_matches_one_shot_encrypt() {
        let content = b"streamed and buffered paths must produce byte-identical output";
        let expected = encrypt(content, &material()).unwrap();

        for chunk in [1, 3, 16, 17, 64, content.len()] {
            assert_eq!(
                write_through(content, chunk),
                expected,
                "chunk size {chunk} diverged from the one-shot path"
            );
        }
    }

    #[test]
    fn test_writer_empty_input_is_one_padding_block() {
        let out = write_through(b"", 1);
        assert_eq!(out.len(), BLOCK_SIZE);
        assert_eq!(decrypt(&out, &material()).unwrap(), b"");
    }

    #[test]
    fn test_writer_block_aligned_input() {
        let content = vec![0x7Eu8; 4 * BLOCK_SIZE];
        let out = write_through(&content, 7);
        assert_eq!(out, encrypt(&content, &material()).unwrap());
        assert_eq!(out.len(), content.len() + BLOCK_SIZE);
    }

    fn read_through(ciphertext: &[u8], buf_size: usize) -> io::Result<Vec<u8>> {
        let mut reader = CipherReader::new(ciphertext, &material()).unwrap();
        let mut out = Vec::new();
        let mut buf = vec![0u8; buf_size.max(1)];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    #[test]
    fn test_reader_roundtrip() {
        let content = b"incremental decryption must agree with the one-shot engine";
        let ciphertext = encrypt(content, &material()).unwrap();

        for buf_size in [1, 2, 15, 16, 17, 1024] {
            assert_eq!(read_through(&ciphertext, buf_size).unwrap(), content);
        }
    }

    #[test]
    fn test_reader_empty_plaintext() {
        let ciphertext = encrypt(b"", &material()).unwrap();
        assert_eq!(read_through(&ciphertext, 8).unwrap(), b"");
    }

    #[test]
    fn test_reader_rejects_empty_source() {
        assert!(read_through(b"", 8).is_err());
    }

    #[test]
    fn test_reader_rejects_unaligned_source() {
        let mut ciphertext = encrypt(b"some data", &material()).unwrap();
        ciphertext.pop();
        let err = read_through(&ciphertext, 64).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_reader_wrong_key_never_yields_plaintext() {
        let content = b"wrong keys must not decode silently to the original";
        let ciphertext = encrypt(content, &material()).unwrap();

        let wrong = KeyMaterial::new(&[0x77; 32], &[0x88; 16]).unwrap();
        let mut reader = CipherReader::new(&ciphertext[..], &wrong).unwrap();
        let mut out = Vec::new();
        match reader.read_to_end(&mut out) {
            Err(_) => {}
            Ok(_) => assert_ne!(out, content),
        }
    }

    #[test]
    fn test_reader_partial_read_then_drop_is_clean() {
        let content = vec![0x31u8; 10 * BLOCK_SIZE];
        let ciphertext = encrypt(&content, &material()).unwrap();

        let mut reader = CipherReader::new(&ciphertext[..], &material()).unwrap();
        let mut buf = [0u8; 8];
        let n = reader.read(&mut buf).unwrap();
        assert!(n > 0);
        assert_eq!(&buf[..n], &content[..n]);
        // Dropping with most of the stream unread must not panic or err.
        drop(reader);
    }
}
