// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Catalog cache shared between clients.
//!
//! Entries never expire; callers that need a fresh catalog clear the cache
//! or build a new client.

use crate::types::CatalogResponse;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("catalog cache error: {0}")]
pub struct CacheError(pub String);

/// Storage for the unpruned catalog. Implementations must be safe to share
/// between threads; the client never mutates a stored catalog.
pub trait CatalogCache: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<Arc<CatalogResponse>>, CacheError>;
    fn set(&self, key: &str, catalog: Arc<CatalogResponse>) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogCache {
    entries: Mutex<HashMap<String, Arc<CatalogResponse>>>,
}

impl InMemoryCatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry so the next `get_catalog` hits the broker again
    pub fn clear(&self) -> Result<(), CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError(e.to_string()))?
            .clear();
        Ok(())
    }
}

impl CatalogCache for InMemoryCatalogCache {
    fn get(&self, key: &str) -> Result<Option<Arc<CatalogResponse>>, CacheError> {
        let entries = self.entries.lock().map_err(|e| CacheError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, catalog: Arc<CatalogResponse>) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|e| CacheError(e.to_string()))?;
        entries.insert(key.to_string(), catalog);
        Ok(())
    }
}
