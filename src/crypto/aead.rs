//! AEAD_AES_CBC_HMAC_SHA2 authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 16-byte IV, pads and
//! CBC-encrypts the plaintext, then appends a truncated HMAC tag over
//! `AAD || IV || ciphertext || AL`.
//!
//! Layout of the returned byte buffer:
//!   [ 16-byte IV | AES-CBC ciphertext | tag (16, 24 or 32 bytes) ]
//!
//! `decrypt` checks the tag before touching the cipher. A bad tag and a
//! bad pad produce the same `DecryptionFailed` error.

use std::fmt;

use zeroize::Zeroizing;

use super::cbc::{cbc_decrypt, cbc_encrypt, AesKey, IV_SIZE};
use super::keys::{fill_random, split_key, Algorithm};
use super::padding::{pad, unpad, BLOCK_SIZE};
use super::tag::{compute_tag, verify_tag};
use crate::errors::{CbcHmacError, Result};

/// An authenticated cipher with associated data.
///
/// Implementations are stateless per call and safe to share across
/// threads.
pub trait Aead: Send + Sync {
    /// Encrypt and authenticate `plaintext`, binding it to `aad`.
    fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>>;

    /// Verify and decrypt an envelope produced by `encrypt` with the same `aad`.
    fn decrypt(&self, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>>;
}

/// AES-CBC + HMAC-SHA2 over a single combined key.
///
/// Built once from a 32, 48 or 64 byte key and then used read-only.
/// The MAC key and AES key schedule are zeroed on drop.
#[derive(Clone)]
pub struct AesCbcHmac {
    algorithm: Algorithm,
    mac_key: Zeroizing<Vec<u8>>,
    cipher: AesKey,
}

impl AesCbcHmac {
    /// Build the primitive from a combined `MAC_KEY || ENC_KEY`.
    pub fn new(key: &[u8]) -> Result<Self> {
        let split = split_key(key)?;
        let cipher = AesKey::new(split.enc_key())?;
        tracing::debug!(algorithm = %split.algorithm(), "initialized aes-cbc-hmac");

        Ok(Self {
            algorithm: split.algorithm(),
            mac_key: Zeroizing::new(split.mac_key().to_vec()),
            cipher,
        })
    }

    /// The variant selected by the key length.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Length of the combined key this instance was built from.
    pub fn key_size(&self) -> usize {
        self.algorithm.key_size()
    }

    /// Length of the trailing authentication tag.
    pub fn tag_size(&self) -> usize {
        self.algorithm.tag_size()
    }

    /// Exact envelope length for a plaintext of `plaintext_len` bytes.
    pub fn ciphertext_len(&self, plaintext_len: usize) -> usize {
        plaintext_len + self.overhead(plaintext_len)
    }

    /// Bytes added on top of the plaintext: IV, padding and tag.
    pub fn overhead(&self, plaintext_len: usize) -> usize {
        let padding = BLOCK_SIZE - plaintext_len % BLOCK_SIZE;
        IV_SIZE + padding + self.tag_size()
    }

    /// Encrypt with a caller-chosen IV.
    ///
    /// Only for reproducing published test vectors. Reusing an IV under
    /// the same key leaks plaintext relationships; use `encrypt`.
    pub fn encrypt_with_iv(
        &self,
        iv: &[u8; IV_SIZE],
        plaintext: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>> {
        let ciphertext = cbc_encrypt(&self.cipher, iv, pad(plaintext));
        let tag = compute_tag(self.algorithm, &self.mac_key, aad, iv, &ciphertext)?;

        let mut output = Vec::with_capacity(IV_SIZE + ciphertext.len() + tag.len());
        output.extend_from_slice(iv);
        output.extend_from_slice(&ciphertext);
        output.extend_from_slice(&tag);
        Ok(output)
    }
}

impl Aead for AesCbcHmac {
    fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let mut iv = [0u8; IV_SIZE];
        fill_random(&mut iv)?;
        self.encrypt_with_iv(&iv, plaintext, aad)
    }

    fn decrypt(&self, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        let tag_size = self.tag_size();

        // Structural checks only; nothing secret is involved yet.
        if ciphertext.len() < IV_SIZE + tag_size {
            tracing::debug!(len = ciphertext.len(), "rejected short ciphertext");
            return Err(CbcHmacError::MalformedCiphertext("ciphertext too short"));
        }

        let (iv, rest) = ciphertext.split_at(IV_SIZE);
        let (body, tag) = rest.split_at(rest.len() - tag_size);

        if body.is_empty() || body.len() % BLOCK_SIZE != 0 {
            tracing::debug!(len = ciphertext.len(), "rejected unaligned ciphertext");
            return Err(CbcHmacError::MalformedCiphertext(
                "ciphertext is not a positive multiple of the block size",
            ));
        }

        let mut iv_block = [0u8; IV_SIZE];
        iv_block.copy_from_slice(iv);

        let plaintext = if verify_tag(self.algorithm, &self.mac_key, aad, iv, body, tag)? {
            cbc_decrypt(&self.cipher, &iv_block, body).and_then(unpad).ok()
        } else {
            None
        };

        plaintext.ok_or_else(|| {
            tracing::debug!("decryption failed");
            CbcHmacError::DecryptionFailed
        })
    }
}

impl fmt::Debug for AesCbcHmac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesCbcHmac")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
