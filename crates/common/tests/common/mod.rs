//! Shared test utilities for registry integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::claim::{ClaimError, ClaimStore, MemoryClaimStore, MemoryClaimStoreError};
use common::codebook::Codebook;
use common::crypto::SecretHash;
use common::registry::Registry;

/// Set up a registry over a fresh in-memory store
pub fn setup_registry() -> (Registry<MemoryClaimStore>, MemoryClaimStore) {
    let store = MemoryClaimStore::new();
    (Registry::new(store.clone()), store)
}

/// Set up a registry with `path` already claimed under `secret`
pub async fn setup_claimed(
    path: &str,
    secret: &str,
) -> (Registry<MemoryClaimStore>, MemoryClaimStore) {
    let (registry, store) = setup_registry();
    registry.submit_secret(path, secret).await.unwrap();
    (registry, store)
}

/// Build form-style edits from `(letter, value)` pairs
pub fn edits(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Form-style edits carrying every letter of `codebook`
pub fn full_edits(codebook: &Codebook) -> HashMap<String, String> {
    codebook
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A store operation that [`FailingClaimStore`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    SecretHash,
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("store unavailable during {0:?}")]
pub struct StoreUnavailable(pub StoreOp);

/// Wraps a [`MemoryClaimStore`] and fails the chosen operations with
///  `ClaimError::Provider`
#[derive(Debug, Clone, Default)]
pub struct FailingClaimStore {
    inner: MemoryClaimStore,
    failing: Arc<Mutex<HashSet<StoreOp>>>,
}

impl FailingClaimStore {
    pub fn inner(&self) -> &MemoryClaimStore {
        &self.inner
    }

    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn recover(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, op: StoreOp) -> Result<(), ClaimError<StoreUnavailable>> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ClaimError::Provider(StoreUnavailable(op)));
        }
        Ok(())
    }
}

fn relabel(e: ClaimError<MemoryClaimStoreError>) -> ClaimError<StoreUnavailable> {
    match e {
        ClaimError::MalformedCodebook(path, e) => ClaimError::MalformedCodebook(path, e),
        ClaimError::NotFound(path) => ClaimError::NotFound(path),
        ClaimError::AlreadyExists(path) => ClaimError::AlreadyExists(path),
        ClaimError::Provider(e) => panic!("memory store failed: {}", e),
    }
}

#[async_trait]
impl ClaimStore for FailingClaimStore {
    type Error = StoreUnavailable;

    async fn get(&self, path: &str) -> Result<Option<Codebook>, ClaimError<Self::Error>> {
        self.check(StoreOp::Get)?;
        self.inner.get(path).await.map_err(relabel)
    }

    async fn secret_hash(&self, path: &str) -> Result<Option<SecretHash>, ClaimError<Self::Error>> {
        self.check(StoreOp::SecretHash)?;
        self.inner.secret_hash(path).await.map_err(relabel)
    }

    async fn create(
        &self,
        path: &str,
        secret_hash: &SecretHash,
        codebook: &Codebook,
    ) -> Result<(), ClaimError<Self::Error>> {
        self.check(StoreOp::Create)?;
        self.inner
            .create(path, secret_hash, codebook)
            .await
            .map_err(relabel)
    }

    async fn update(&self, path: &str, codebook: &Codebook) -> Result<(), ClaimError<Self::Error>> {
        self.check(StoreOp::Update)?;
        self.inner.update(path, codebook).await.map_err(relabel)
    }
}

/// Set up a registry over a store that fails on demand, with `path` claimed under `secret`
pub async fn setup_failing(
    path: &str,
    secret: &str,
) -> (Registry<FailingClaimStore>, FailingClaimStore) {
    let store = FailingClaimStore::default();
    let registry = Registry::new(store.clone());
    registry.submit_secret(path, secret).await.unwrap();
    (registry, store)
}
