//! The claim/edit state machine over a [`ClaimStore`].
//!
//! A path moves from absent, to unclaimed (a record with no secret), to
//! claimed. Absent and unclaimed paths read as the default codebook; only a
//! claimed path serves what is stored for it. The first secret submitted for
//! a path claims it, and every later edit must present the same secret.
//!
//! The view-returning calls ([`Registry::resolve`], [`Registry::save`]) never
//! fail: storage trouble degrades to the default codebook plus a [`Notice`]
//! for the user, so a page can always be rendered.

use std::collections::HashMap;
use std::fmt;

use crate::claim::{ClaimError, ClaimStore};
use crate::codebook::Codebook;
use crate::crypto::{SecretHash, SecretHashError};

/// Claim state of a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// No record exists
    Absent,
    /// A record exists without a secret
    Unclaimed,
    /// A record exists and is guarded by a secret
    Claimed,
}

/// User-facing message attached to a degraded or rejected request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoadFailed,
    InvalidSecret,
    VerifyFailed,
    SaveFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LoadFailed => "Unable to load valueMap",
            Notice::InvalidSecret => "Invalid Secret",
            Notice::VerifyFailed => "Unable to verify secret",
            Notice::SaveFailed => "Unable to save valueMap",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything needed to render a path: its effective codebook, whether it is
///  claimed, and an optional notice for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebookView {
    pub path: String,
    pub codebook: Codebook,
    pub is_claimed: bool,
    pub notice: Option<Notice>,
}

impl CodebookView {
    fn new(path: &str, codebook: Codebook, is_claimed: bool) -> Self {
        Self {
            path: path.to_string(),
            codebook,
            is_claimed,
            notice: None,
        }
    }

    fn degraded(path: &str, is_claimed: bool, notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::new(path, Codebook::default(), is_claimed)
        }
    }
}

/// Proof that the holder presented the right secret for a path.
///
/// Only [`Registry::submit_secret`] hands these out, and
///  [`Registry::apply_edits`] consumes one per edit.
#[derive(Debug)]
pub struct EditGrant {
    path: String,
}

impl EditGrant {
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError<T> {
    #[error("claim store error: {0}")]
    Claim(#[from] ClaimError<T>),
    #[error("invalid secret")]
    InvalidSecret,
    #[error("secret hash error: {0}")]
    SecretHash(#[from] SecretHashError),
    #[error("secret hashing task failed: {0}")]
    Task(String),
}

/// Entry point for reading, claiming and editing codebooks
#[derive(Debug, Clone)]
pub struct Registry<S> {
    store: S,
}

impl<S: ClaimStore> Registry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Work out which claim state a path is in
    pub async fn state(&self, path: &str) -> Result<PathState, RegistryError<S::Error>> {
        if self.store.secret_hash(path).await?.is_some() {
            return Ok(PathState::Claimed);
        }
        Ok(match self.store.get(path).await? {
            Some(_) => PathState::Unclaimed,
            None => PathState::Absent,
        })
    }

    /// Resolve the codebook a path should be rendered with
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, path: &str) -> CodebookView {
        let secret_hash = match self.store.secret_hash(path).await {
            Ok(secret_hash) => secret_hash,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read claim state");
                return CodebookView::degraded(path, false, Notice::LoadFailed);
            }
        };

        if secret_hash.is_none() {
            return CodebookView::new(path, Codebook::default(), false);
        }

        match self.store.get(path).await {
            Ok(Some(codebook)) => CodebookView::new(path, codebook, true),
            Ok(None) => {
                tracing::warn!("claimed path has no stored codebook");
                CodebookView::degraded(path, true, Notice::LoadFailed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load codebook");
                CodebookView::degraded(path, true, Notice::LoadFailed)
            }
        }
    }

    /// Present a secret for a path.
    ///
    /// An unclaimed or absent path is claimed with `candidate` and starts out
    ///  with the default codebook. A claimed path only accepts the secret it
    ///  was claimed with. Surrounding whitespace in `candidate` is trimmed
    ///  both when claiming and when verifying, so `" pw "` and `"pw"` are
    ///  the same secret either way.
    #[tracing::instrument(skip(self, candidate))]
    pub async fn submit_secret(
        &self,
        path: &str,
        candidate: &str,
    ) -> Result<EditGrant, RegistryError<S::Error>> {
        let candidate = candidate.trim();

        match self.store.secret_hash(path).await? {
            Some(secret_hash) => self.check_secret(&secret_hash, candidate).await?,
            None => {
                let secret_hash = hash_secret(candidate).await?;
                match self
                    .store
                    .create(path, &secret_hash, &Codebook::default())
                    .await
                {
                    Ok(()) => tracing::info!("path claimed"),
                    Err(ClaimError::AlreadyExists(_)) => {
                        // someone else claimed it first, so their secret decides
                        tracing::debug!("lost claim race, verifying against winner");
                        let winner = self.store.secret_hash(path).await?.ok_or_else(|| {
                            ClaimError::<S::Error>::NotFound(path.to_string())
                        })?;
                        self.check_secret(&winner, candidate).await?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        Ok(EditGrant {
            path: path.to_string(),
        })
    }

    /// Replace the codebook of a path the grant was issued for.
    ///
    /// Every letter takes its value from `edits`; letters missing from
    ///  `edits` are stored as empty strings rather than kept.
    #[tracing::instrument(skip(self, grant, edits), fields(path = grant.path()))]
    pub async fn apply_edits(
        &self,
        grant: EditGrant,
        edits: &HashMap<String, String>,
    ) -> Result<Codebook, RegistryError<S::Error>> {
        let codebook = Codebook::from_fields(edits);
        self.store.update(&grant.path, &codebook).await?;
        tracing::info!("codebook saved");
        Ok(codebook)
    }

    /// Claim or verify, then store the submitted edits
    #[tracing::instrument(skip(self, candidate, edits))]
    pub async fn save(
        &self,
        path: &str,
        candidate: &str,
        edits: &HashMap<String, String>,
    ) -> CodebookView {
        let grant = match self.submit_secret(path, candidate).await {
            Ok(grant) => grant,
            Err(RegistryError::InvalidSecret) => {
                return self.resolve_with(path, Notice::InvalidSecret).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to verify secret");
                return self.resolve_with(path, Notice::VerifyFailed).await;
            }
        };

        match self.apply_edits(grant, edits).await {
            Ok(codebook) => CodebookView::new(path, codebook, true),
            Err(e) => {
                tracing::warn!(error = %e, "failed to save codebook");
                self.resolve_with(path, Notice::SaveFailed).await
            }
        }
    }

    async fn resolve_with(&self, path: &str, notice: Notice) -> CodebookView {
        CodebookView {
            notice: Some(notice),
            ..self.resolve(path).await
        }
    }

    async fn check_secret(
        &self,
        secret_hash: &SecretHash,
        candidate: &str,
    ) -> Result<(), RegistryError<S::Error>> {
        let secret_hash = secret_hash.clone();
        let candidate = candidate.to_string();
        let verified = tokio::task::spawn_blocking(move || secret_hash.verify(&candidate))
            .await
            .map_err(|e| RegistryError::Task(e.to_string()))?;

        match verified {
            Ok(true) => Ok(()),
            Ok(false) => Err(RegistryError::InvalidSecret),
            // a hash we cannot read can never be matched
            Err(e) => {
                tracing::warn!(error = %e, "stored secret hash is unusable");
                Err(RegistryError::InvalidSecret)
            }
        }
    }
}

async fn hash_secret<T>(secret: &str) -> Result<SecretHash, RegistryError<T>> {
    let secret = secret.to_string();
    let secret_hash = tokio::task::spawn_blocking(move || SecretHash::generate(&secret))
        .await
        .map_err(|e| RegistryError::Task(e.to_string()))??;
    Ok(secret_hash)
}
