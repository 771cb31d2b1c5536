use thiserror::Error;

/// All errors that can occur in the AES-CBC-HMAC primitive.
///
/// Authentication failures are deliberately collapsed into a single
/// variant: a bad tag and bad padding are indistinguishable to callers.
#[derive(Debug, Error)]
pub enum CbcHmacError {
    // --- Construction errors ---
    #[error("aes_cbc_hmac: invalid AES CBC key size; want 32, 48 or 64, got {0}")]
    InvalidKeySize(usize),

    // --- Decryption errors ---
    #[error("aes_cbc_hmac: {0}")]
    MalformedCiphertext(&'static str),

    #[error("aes_cbc_hmac: failed to decrypt")]
    DecryptionFailed,

    // --- Randomness errors ---
    #[error("aes_cbc_hmac: random source failure: {0}")]
    RandomSourceFailure(String),

    // --- Config errors ---
    #[error("Unknown algorithm '{0}' (want A128CBC-HS256, A192CBC-HS384 or A256CBC-HS512)")]
    UnknownAlgorithm(String),

    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results from this crate.
pub type Result<T> = std::result::Result<T, CbcHmacError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_size_names_received_and_accepted_sizes() {
        let msg = CbcHmacError::InvalidKeySize(31).to_string();
        assert_eq!(
            msg,
            "aes_cbc_hmac: invalid AES CBC key size; want 32, 48 or 64, got 31"
        );
    }

    #[test]
    fn decryption_failed_carries_no_detail() {
        assert_eq!(
            CbcHmacError::DecryptionFailed.to_string(),
            "aes_cbc_hmac: failed to decrypt"
        );
    }

    #[test]
    fn malformed_ciphertext_includes_reason() {
        let e = CbcHmacError::MalformedCiphertext("ciphertext too short");
        assert_eq!(e.to_string(), "aes_cbc_hmac: ciphertext too short");
    }
}
