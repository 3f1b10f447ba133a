//! Cryptographic primitives for ecc
//!
//! Only claim secrets need protecting: a path's secret is never stored, just
//! a salted Argon2id hash of it ([`SecretHash`]). The codebook substitution
//! itself is a toy cipher and offers no confidentiality.

mod secret_hash;

pub use secret_hash::{SecretHash, SecretHashError};
