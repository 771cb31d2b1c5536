//! AEAD_AES_CBC_HMAC_SHA2 authenticated encryption, as used by JWE
//! (`A128CBC-HS256`, `A192CBC-HS384`, `A256CBC-HS512`).
//!
//! ```no_run
//! use aead_cbc_hmac::{Aead, AesCbcHmac, Algorithm};
//!
//! let key = aead_cbc_hmac::generate_key(Algorithm::Aes256CbcHmacSha512)?;
//! let aead = AesCbcHmac::new(&key)?;
//! let envelope = aead.encrypt(b"payload", b"header")?;
//! assert_eq!(aead.decrypt(&envelope, b"header")?, b"payload");
//! # Ok::<(), aead_cbc_hmac::CbcHmacError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod errors;

pub use config::KeyTemplate;
pub use crypto::{generate_key, Aead, AesCbcHmac, Algorithm};
pub use errors::{CbcHmacError, Result};
