//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::BaselineStore;
use crate::types::baseline::Baseline;
use crate::types::loss::CountryLoss;

/// In-memory store keeping serialized payloads by key.
///
/// Payloads are stored as JSON text, so reads go through the same
/// deserialization a persistent store would use. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, String>>,
    writes: RwLock<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw payload under `key`.
    pub fn with_raw(self, key: impl Into<String>, payload: impl Into<String>) -> Self {
        self.objects.write().unwrap().insert(key.into(), payload.into());
        self
    }

    /// Raw payload stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.objects.read().unwrap().get(key).cloned()
    }

    /// Keys in the order they were written.
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn put(&self, key: &str, payload: String) {
        self.objects.write().unwrap().insert(key.to_string(), payload);
        self.writes.write().unwrap().push(key.to_string());
    }
}

#[async_trait]
impl BaselineStore for MemoryStore {
    async fn read_baseline(&self, key: &str) -> StoreResult<Baseline> {
        match self.raw(key) {
            None => Ok(Baseline::new()),
            Some(raw) => Baseline::from_json(&raw).map_err(|source| StoreError::Malformed {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn write_baseline(&self, key: &str, baseline: &Baseline) -> StoreResult<()> {
        let payload = baseline.to_json().map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })?;
        self.put(key, payload);
        Ok(())
    }

    async fn write_delta(&self, key: &str, losses: &[CountryLoss]) -> StoreResult<()> {
        let payload = serde_json::to_string(losses).map_err(|source| StoreError::Malformed {
            key: key.to_string(),
            source,
        })?;
        self.put(key, payload);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
