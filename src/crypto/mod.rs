//! The AEAD_AES_CBC_HMAC_SHA2 primitive.
//!
//! This module provides:
//! - Key splitting and the variant table (`keys`)
//! - PKCS#7 padding (`padding`)
//! - AES-CBC over whole blocks (`cbc`)
//! - Truncated HMAC tag computation and verification (`tag`)
//! - The `encrypt`/`decrypt` construction (`aead`)

pub mod aead;
pub mod cbc;
pub mod keys;
pub mod padding;
pub mod tag;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{AesCbcHmac, Aead, Algorithm, ...};
pub use aead::{Aead, AesCbcHmac};
pub use cbc::IV_SIZE;
pub use keys::{generate_key, split_key, Algorithm, SplitKey};
pub use padding::BLOCK_SIZE;
