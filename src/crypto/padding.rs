//! PKCS#7 padding to the AES block size.
//!
//! `pad` always appends between 1 and 16 bytes, each holding the pad
//! length, so an input that is already block aligned gains a full block.
//! `unpad` inspects the whole final block in constant time and reports
//! every malformed pad as the generic `DecryptionFailed`.

use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};
use zeroize::Zeroize;

use crate::errors::{CbcHmacError, Result};

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Append PKCS#7 padding.
pub fn pad(plaintext: &[u8]) -> Vec<u8> {
    let k = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(plaintext.len() + k);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + k, k as u8);
    padded
}

/// Strip PKCS#7 padding, consuming the padded buffer.
///
/// `padded` must be a non-empty multiple of the block size.
pub fn unpad(mut padded: Vec<u8>) -> Result<Vec<u8>> {
    let len = padded.len();
    if len == 0 || len % BLOCK_SIZE != 0 {
        return Err(CbcHmacError::DecryptionFailed);
    }

    let last_block = &padded[len - BLOCK_SIZE..];
    let k = last_block[BLOCK_SIZE - 1];

    // 1 <= k <= 16
    let mut valid: Choice = k.ct_gt(&0) & k.ct_lt(&(BLOCK_SIZE as u8 + 1));

    // Every byte within the last k positions must equal k. Walk the whole
    // block so the work done does not depend on k.
    for (i, &byte) in last_block.iter().rev().enumerate() {
        let in_pad = (i as u8).ct_lt(&k);
        valid &= !in_pad | byte.ct_eq(&k);
    }

    if !bool::from(valid) {
        padded.zeroize();
        return Err(CbcHmacError::DecryptionFailed);
    }

    padded.truncate(len - k as usize);
    Ok(padded)
}
