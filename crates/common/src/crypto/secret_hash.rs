//! Salted one-way hashes of claim secrets
//!
//! Secrets are hashed with Argon2id and stored in PHC string format
//! (`$argon2id$v=19$...`), which carries its own salt and parameters.
//! Verification re-derives the hash from the candidate and compares in
//! constant time.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SecretHashError {
    #[error("failed to hash secret: {0}")]
    Hash(String),
    #[error("stored secret hash is not a valid PHC string: {0}")]
    Unparsable(String),
}

/// An irreversible, salted hash of a claim secret
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(String);

impl SecretHash {
    /// Hash `secret` under a freshly generated salt
    pub fn generate(secret: &str) -> Result<Self, SecretHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| SecretHashError::Hash(e.to_string()))?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a hash read back from storage.
    ///
    /// An empty string is how storage marks an unclaimed path, so it yields
    /// `None` rather than a hash nothing could ever verify against.
    pub fn from_stored(stored: impl Into<String>) -> Option<Self> {
        let stored = stored.into();
        (!stored.is_empty()).then_some(Self(stored))
    }

    /// Check `candidate` against this hash.
    ///
    /// `Ok(false)` means the candidate is wrong; `Err` means the stored hash
    /// itself could not be parsed.
    pub fn verify(&self, candidate: &str) -> Result<bool, SecretHashError> {
        let parsed =
            PasswordHash::new(&self.0).map_err(|e| SecretHashError::Unparsable(e.to_string()))?;
        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(SecretHashError::Hash(e.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretHash").field(&"<redacted>").finish()
    }
}
