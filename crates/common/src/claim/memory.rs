use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::provider::{ClaimError, ClaimStore};
use crate::codebook::Codebook;
use crate::crypto::SecretHash;

/// In-memory claim store backed by a HashMap
#[derive(Debug, Clone)]
pub struct MemoryClaimStore {
    inner: Arc<RwLock<HashMap<String, MemoryClaimRecord>>>,
}

#[derive(Debug, Clone)]
struct MemoryClaimRecord {
    /// None while the path is unclaimed
    secret_hash: Option<SecretHash>,
    codebook: Codebook,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryClaimStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryClaimStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record that exists but has not been claimed yet
    pub fn insert_unclaimed(
        &self,
        path: &str,
        codebook: Codebook,
    ) -> Result<(), ClaimError<MemoryClaimStoreError>> {
        let mut inner = self.inner.write().map_err(poisoned)?;
        inner.insert(
            path.to_string(),
            MemoryClaimRecord {
                secret_hash: None,
                codebook,
            },
        );
        Ok(())
    }

    /// Number of records held, claimed or not
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryClaimStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> ClaimError<MemoryClaimStoreError> {
    ClaimError::Provider(MemoryClaimStoreError::Internal(format!(
        "failed to acquire lock: {}",
        e
    )))
}

#[async_trait]
impl ClaimStore for MemoryClaimStore {
    type Error = MemoryClaimStoreError;

    async fn get(&self, path: &str) -> Result<Option<Codebook>, ClaimError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner.get(path).map(|record| record.codebook.clone()))
    }

    async fn secret_hash(&self, path: &str) -> Result<Option<SecretHash>, ClaimError<Self::Error>> {
        let inner = self.inner.read().map_err(poisoned)?;
        Ok(inner
            .get(path)
            .and_then(|record| record.secret_hash.clone()))
    }

    async fn create(
        &self,
        path: &str,
        secret_hash: &SecretHash,
        codebook: &Codebook,
    ) -> Result<(), ClaimError<Self::Error>> {
        // check and insert under one write guard
        let mut inner = self.inner.write().map_err(poisoned)?;

        if let Some(existing) = inner.get(path) {
            if existing.secret_hash.is_some() {
                return Err(ClaimError::AlreadyExists(path.to_string()));
            }
        }

        inner.insert(
            path.to_string(),
            MemoryClaimRecord {
                secret_hash: Some(secret_hash.clone()),
                codebook: codebook.clone(),
            },
        );
        Ok(())
    }

    async fn update(&self, path: &str, codebook: &Codebook) -> Result<(), ClaimError<Self::Error>> {
        let mut inner = self.inner.write().map_err(poisoned)?;

        let record = inner
            .get_mut(path)
            .ok_or_else(|| ClaimError::NotFound(path.to_string()))?;
        record.codebook = codebook.clone();
        Ok(())
    }
}
