//! Authentication tag over `AAD || IV || ciphertext || AL`.
//!
//! `AL` is the bit length of the AAD as a 64-bit big-endian integer.
//! The HMAC output is truncated to its leftmost half.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::keys::Algorithm;
use crate::errors::{CbcHmacError, Result};

/// Compute the truncated tag for one envelope.
pub fn compute_tag(
    algorithm: Algorithm,
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let mut full = match algorithm {
        Algorithm::Aes128CbcHmacSha256 => {
            hmac_over::<Hmac<Sha256>>(mac_key, aad, iv, ciphertext)?
        }
        Algorithm::Aes192CbcHmacSha384 => {
            hmac_over::<Hmac<Sha384>>(mac_key, aad, iv, ciphertext)?
        }
        Algorithm::Aes256CbcHmacSha512 => {
            hmac_over::<Hmac<Sha512>>(mac_key, aad, iv, ciphertext)?
        }
    };
    full.truncate(algorithm.tag_size());
    Ok(full)
}

/// Recompute the tag and compare it to `tag` in constant time.
pub fn verify_tag(
    algorithm: Algorithm,
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<bool> {
    let expected = compute_tag(algorithm, mac_key, aad, iv, ciphertext)?;
    Ok(expected.as_slice().ct_eq(tag).into())
}

fn hmac_over<M: Mac + hmac::digest::KeyInit>(
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(mac_key)
        .map_err(|_| CbcHmacError::InvalidKeySize(mac_key.len() * 2))?;

    // AAD is bounded by 2^61 bytes, so the bit length fits in 64 bits.
    let aad_bits = (aad.len() as u64).wrapping_mul(8);

    mac.update(aad);
    mac.update(iv);
    mac.update(ciphertext);
    mac.update(&aad_bits.to_be_bytes());

    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IV: [u8; 16] = [3u8; 16];

    #[test]
    fn tag_length_is_half_digest() {
        for alg in Algorithm::ALL {
            let key = vec![1u8; alg.half_key_size()];
            let tag = compute_tag(alg, &key, b"aad", &IV, &[0u8; 16]).unwrap();
            assert_eq!(tag.len(), alg.tag_size());
        }
    }

    #[test]
    fn tag_is_truncated_hmac_of_concatenation() {
        let key = [0x0bu8; 16];
        let aad = b"header";
        let ct = [0x5au8; 32];

        let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
        mac.update(aad);
        mac.update(&IV);
        mac.update(&ct);
        mac.update(&48u64.to_be_bytes());
        let full = mac.finalize().into_bytes();

        let tag = compute_tag(Algorithm::Aes128CbcHmacSha256, &key, aad, &IV, &ct).unwrap();
        assert_eq!(tag.as_slice(), &full[..16]);
    }

    #[test]
    fn verify_accepts_matching_tag() {
        let key = [2u8; 24];
        let alg = Algorithm::Aes192CbcHmacSha384;
        let tag = compute_tag(alg, &key, b"a", &IV, &[9u8; 16]).unwrap();
        assert!(verify_tag(alg, &key, b"a", &IV, &[9u8; 16], &tag).unwrap());
    }

    #[test]
    fn verify_rejects_any_changed_input() {
        let key = [2u8; 32];
        let alg = Algorithm::Aes256CbcHmacSha512;
        let ct = [9u8; 16];
        let tag = compute_tag(alg, &key, b"a", &IV, &ct).unwrap();

        assert!(!verify_tag(alg, &key, b"b", &IV, &ct, &tag).unwrap());
        assert!(!verify_tag(alg, &key, b"a", &[4u8; 16], &ct, &tag).unwrap());
        assert!(!verify_tag(alg, &key, b"a", &IV, &[8u8; 16], &tag).unwrap());

        let mut bad = tag.clone();
        bad[31] ^= 0x01;
        assert!(!verify_tag(alg, &key, b"a", &IV, &ct, &bad).unwrap());
        assert!(!verify_tag(alg, &key, b"a", &IV, &ct, &tag[..16]).unwrap());
    }

    #[test]
    fn aad_length_is_bound_into_tag() {
        // With an empty IV, moving a byte from AAD to ciphertext leaves the
        // concatenation unchanged; only AL differs.
        let key = [5u8; 16];
        let alg = Algorithm::Aes128CbcHmacSha256;
        let t1 = compute_tag(alg, &key, b"ab", &[], b"c").unwrap();
        let t2 = compute_tag(alg, &key, b"a", &[], b"bc").unwrap();
        assert_ne!(t1, t2);
    }
}
