//! Key splitting and the fixed algorithm table.
//!
//! A combined key of 32, 48 or 64 bytes is split into two equal halves:
//! - the **first** half is the HMAC key,
//! - the **second** half is the AES key.
//!
//! The half length alone selects the variant (16 -> AES-128/HMAC-SHA256,
//! 24 -> AES-192/HMAC-SHA384, 32 -> AES-256/HMAC-SHA512).

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{CbcHmacError, Result};

/// The three supported AEAD_AES_CBC_HMAC_SHA2 variants.
///
/// Serialized with their JWE `enc` identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "A128CBC-HS256")]
    Aes128CbcHmacSha256,
    #[serde(rename = "A192CBC-HS384")]
    Aes192CbcHmacSha384,
    #[serde(rename = "A256CBC-HS512")]
    Aes256CbcHmacSha512,
}

impl Algorithm {
    /// All variants, smallest key first.
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Aes128CbcHmacSha256,
        Algorithm::Aes192CbcHmacSha384,
        Algorithm::Aes256CbcHmacSha512,
    ];

    /// Pick the variant for a combined key length.
    pub fn from_key_size(len: usize) -> Result<Self> {
        match len {
            32 => Ok(Algorithm::Aes128CbcHmacSha256),
            48 => Ok(Algorithm::Aes192CbcHmacSha384),
            64 => Ok(Algorithm::Aes256CbcHmacSha512),
            other => Err(CbcHmacError::InvalidKeySize(other)),
        }
    }

    /// Length of the combined (MAC || ENC) key in bytes.
    pub fn key_size(self) -> usize {
        self.half_key_size() * 2
    }

    /// Length of each half: the MAC key and the AES key.
    pub fn half_key_size(self) -> usize {
        match self {
            Algorithm::Aes128CbcHmacSha256 => 16,
            Algorithm::Aes192CbcHmacSha384 => 24,
            Algorithm::Aes256CbcHmacSha512 => 32,
        }
    }

    /// Truncated tag length: half the digest output.
    ///
    /// Equal to the half key size for every variant.
    pub fn tag_size(self) -> usize {
        self.half_key_size()
    }

    /// The JWE `enc` header value for this variant.
    pub fn jwe_name(self) -> &'static str {
        match self {
            Algorithm::Aes128CbcHmacSha256 => "A128CBC-HS256",
            Algorithm::Aes192CbcHmacSha384 => "A192CBC-HS384",
            Algorithm::Aes256CbcHmacSha512 => "A256CBC-HS512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwe_name())
    }
}

impl FromStr for Algorithm {
    type Err = CbcHmacError;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.jwe_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CbcHmacError::UnknownAlgorithm(s.to_string()))
    }
}

/// A combined key split into its MAC and encryption halves.
///
/// Holds a private copy of the key bytes and zeroes it on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SplitKey {
    bytes: Vec<u8>,
    #[zeroize(skip)]
    algorithm: Algorithm,
}

impl SplitKey {
    /// The variant selected by the key length.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// First half of the combined key.
    pub fn mac_key(&self) -> &[u8] {
        &self.bytes[..self.algorithm.half_key_size()]
    }

    /// Second half of the combined key.
    pub fn enc_key(&self) -> &[u8] {
        &self.bytes[self.algorithm.half_key_size()..]
    }
}

impl fmt::Debug for SplitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// Split a combined key into MAC key, encryption key and variant.
///
/// Fails with `InvalidKeySize` unless the key is 32, 48 or 64 bytes.
pub fn split_key(combined_key: &[u8]) -> Result<SplitKey> {
    let algorithm = Algorithm::from_key_size(combined_key.len())?;
    Ok(SplitKey {
        bytes: combined_key.to_vec(),
        algorithm,
    })
}

/// Generate a fresh random combined key for `algorithm`.
pub fn generate_key(algorithm: Algorithm) -> Result<Zeroizing<Vec<u8>>> {
    let mut key = Zeroizing::new(vec![0u8; algorithm.key_size()]);
    fill_random(&mut key)?;
    Ok(key)
}

/// Fill `buf` from the OS CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CbcHmacError::RandomSourceFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_halves_are_equal_length() {
        for len in [32usize, 48, 64] {
            let key: Vec<u8> = (0..len as u8).collect();
            let split = split_key(&key).unwrap();
            assert_eq!(split.mac_key().len(), len / 2);
            assert_eq!(split.enc_key().len(), len / 2);
            assert_eq!(split.mac_key(), &key[..len / 2]);
            assert_eq!(split.enc_key(), &key[len / 2..]);
        }
    }

    #[test]
    fn half_length_selects_digest() {
        assert_eq!(
            split_key(&[0u8; 32]).unwrap().algorithm(),
            Algorithm::Aes128CbcHmacSha256
        );
        assert_eq!(
            split_key(&[0u8; 48]).unwrap().algorithm(),
            Algorithm::Aes192CbcHmacSha384
        );
        assert_eq!(
            split_key(&[0u8; 64]).unwrap().algorithm(),
            Algorithm::Aes256CbcHmacSha512
        );
    }

    #[test]
    fn rejects_other_sizes() {
        for len in [0usize, 16, 24, 31, 33, 56, 65, 128] {
            let err = split_key(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, CbcHmacError::InvalidKeySize(n) if n == len));
        }
    }

    #[test]
    fn tag_sizes_match_table() {
        assert_eq!(Algorithm::Aes128CbcHmacSha256.tag_size(), 16);
        assert_eq!(Algorithm::Aes192CbcHmacSha384.tag_size(), 24);
        assert_eq!(Algorithm::Aes256CbcHmacSha512.tag_size(), 32);
    }

    #[test]
    fn jwe_names_roundtrip_through_from_str() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
        assert_eq!(
            "a128cbc-hs256".parse::<Algorithm>().unwrap(),
            Algorithm::Aes128CbcHmacSha256
        );
        assert!("A128GCM".parse::<Algorithm>().is_err());
    }

    #[test]
    fn generated_keys_have_variant_size_and_differ() {
        for alg in Algorithm::ALL {
            let k1 = generate_key(alg).unwrap();
            let k2 = generate_key(alg).unwrap();
            assert_eq!(k1.len(), alg.key_size());
            assert_ne!(*k1, *k2);
        }
    }

    #[test]
    fn debug_does_not_print_key_bytes() {
        let split = split_key(&[0xAB; 32]).unwrap();
        let dbg = format!("{split:?}");
        assert_eq!(dbg, "SplitKey { algorithm: Aes128CbcHmacSha256, .. }");
    }
}
