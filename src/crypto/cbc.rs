//! AES in CBC mode over whole blocks.
//!
//! Encryption: `C[i] = E(K, P[i] ^ C[i-1])` with `C[-1] = IV`.
//! Decryption is the inverse. Padding is handled by the caller; the
//! buffers here are always a non-empty multiple of the block size.

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};

use super::padding::BLOCK_SIZE;
use crate::errors::{CbcHmacError, Result};

/// Length of the CBC initialization vector.
pub const IV_SIZE: usize = BLOCK_SIZE;

/// An expanded AES key of one of the three supported sizes.
///
/// The `aes` key schedules zero themselves on drop.
#[derive(Clone)]
pub enum AesKey {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesKey {
    /// Expand a 16, 24 or 32 byte AES key.
    pub fn new(enc_key: &[u8]) -> Result<Self> {
        let expanded = match enc_key.len() {
            16 => Aes128::new_from_slice(enc_key).map(AesKey::Aes128),
            24 => Aes192::new_from_slice(enc_key).map(AesKey::Aes192),
            32 => Aes256::new_from_slice(enc_key).map(AesKey::Aes256),
            other => return Err(CbcHmacError::InvalidKeySize(other * 2)),
        };
        // Sizes are reported in terms of the combined key.
        expanded.map_err(|_| CbcHmacError::InvalidKeySize(enc_key.len() * 2))
    }

    fn encrypt_block(&self, block: &mut Block) {
        match self {
            AesKey::Aes128(c) => c.encrypt_block(block),
            AesKey::Aes192(c) => c.encrypt_block(block),
            AesKey::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_block(&self, block: &mut Block) {
        match self {
            AesKey::Aes128(c) => c.decrypt_block(block),
            AesKey::Aes192(c) => c.decrypt_block(block),
            AesKey::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// CBC-encrypt `padded` in place and return it.
///
/// `padded` must already be block aligned (see `padding::pad`).
pub fn cbc_encrypt(key: &AesKey, iv: &[u8; IV_SIZE], mut padded: Vec<u8>) -> Vec<u8> {
    debug_assert!(!padded.is_empty() && padded.len() % BLOCK_SIZE == 0);

    let mut prev = *iv;
    for chunk in padded.chunks_exact_mut(BLOCK_SIZE) {
        xor_in_place(chunk, &prev);
        key.encrypt_block(Block::from_mut_slice(chunk));
        prev.copy_from_slice(chunk);
    }
    padded
}

/// CBC-decrypt `ciphertext`, returning the still-padded plaintext.
pub fn cbc_decrypt(key: &AesKey, iv: &[u8; IV_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CbcHmacError::MalformedCiphertext(
            "ciphertext is not a positive multiple of the block size",
        ));
    }

    let mut out = ciphertext.to_vec();
    let mut prev = *iv;
    for chunk in out.chunks_exact_mut(BLOCK_SIZE) {
        let mut current = [0u8; BLOCK_SIZE];
        current.copy_from_slice(chunk);
        key.decrypt_block(Block::from_mut_slice(chunk));
        xor_in_place(chunk, &prev);
        prev = current;
    }
    Ok(out)
}

fn xor_in_place(dst: &mut [u8], src: &[u8; BLOCK_SIZE]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
