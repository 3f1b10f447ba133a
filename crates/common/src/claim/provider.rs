use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::codebook::{Codebook, CodebookError};
use crate::crypto::SecretHash;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimError<T> {
    /// The backing store failed
    #[error("unhandled claim store error: {0}")]
    Provider(#[from] T),
    /// A persisted codebook could not be decoded
    #[error("stored codebook for {0} is malformed: {1}")]
    MalformedCodebook(String, CodebookError),
    /// An update targeted a path with no record
    #[error("no claim record for path {0}")]
    NotFound(String),
    /// A create targeted a path that is already claimed
    #[error("path {0} is already claimed")]
    AlreadyExists(String),
}

/// Durable storage of claim records keyed by path.
///
/// Implementations never synthesize records on read and never overwrite a
///  claimed record's secret hash. `create` must be atomic per path: of two
///  racing creates on the same path at most one may succeed.
#[async_trait]
pub trait ClaimStore: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync;

    /// Get the codebook stored for a path
    ///
    /// # Returns
    /// * `Ok(Some(Codebook))` - A record exists for the path
    /// * `Ok(None)` - No record exists; nothing is created
    /// * `Err(ClaimError::MalformedCodebook)` - The stored codebook is corrupt
    async fn get(&self, path: &str) -> Result<Option<Codebook>, ClaimError<Self::Error>>;

    /// Get the secret hash guarding a path
    ///
    /// Returns `None` both for absent paths and for records stored with an
    ///  empty hash, i.e. whenever the path is unclaimed.
    async fn secret_hash(&self, path: &str) -> Result<Option<SecretHash>, ClaimError<Self::Error>>;

    /// Claim a path, storing its secret hash and initial codebook
    ///
    /// An absent path gets a new record; an unclaimed record is claimed in
    ///  place and its codebook replaced.
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(ClaimError::AlreadyExists)` - The path is already claimed
    async fn create(
        &self,
        path: &str,
        secret_hash: &SecretHash,
        codebook: &Codebook,
    ) -> Result<(), ClaimError<Self::Error>>;

    /// Replace the codebook of an existing record, leaving its secret hash as is
    ///
    /// Should fail with the following errors to be considered
    ///  correct:
    /// * `Err(ClaimError::NotFound)` - No record exists for the path
    async fn update(&self, path: &str, codebook: &Codebook) -> Result<(), ClaimError<Self::Error>>;

    /// Whether a path currently has a claimed record
    async fn is_claimed(&self, path: &str) -> Result<bool, ClaimError<Self::Error>> {
        Ok(self.secret_hash(path).await?.is_some())
    }
}
