// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::transport::{decode, handle_failure_response};
use super::Client;
use crate::constants::{paths, CATALOG_CACHE_KEY};
use crate::error::Result;
use crate::types::CatalogResponse;
use http::{Method, StatusCode};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

impl Client {
    /// Fetch the broker catalog, pruned to the negotiated API version.
    ///
    /// With a cache configured the first successful fetch is kept forever;
    /// the cache holds the unpruned catalog and each call prunes a copy.
    #[instrument(skip(self), fields(broker = %self.name))]
    pub async fn get_catalog(&self) -> Result<CatalogResponse> {
        let Some(cache) = &self.catalog_cache else {
            let catalog = self.fetch_catalog().await?;
            return Ok(self.prune(&catalog));
        };

        let _guard = self.catalog_lock.lock().await;

        match cache.get(CATALOG_CACHE_KEY) {
            Ok(Some(catalog)) => {
                debug!("Serving catalog from cache");
                return Ok(self.prune(&catalog));
            }
            Ok(None) => debug!("Catalog not cached, fetching from broker"),
            Err(e) => warn!("Failed to read catalog cache, fetching from broker: {}", e),
        }

        let catalog = Arc::new(self.fetch_catalog().await?);
        if let Err(e) = cache.set(CATALOG_CACHE_KEY, catalog.clone()) {
            warn!("Failed to store catalog in cache: {}", e);
        }

        Ok(self.prune(&catalog))
    }

    async fn fetch_catalog(&self) -> Result<CatalogResponse> {
        let url = self.endpoint(&[paths::V2, paths::CATALOG])?;
        let response = self.send(Method::GET, url, &[], None).await?;

        match response.status() {
            StatusCode::OK => decode(&response),
            _ => Err(handle_failure_response(&response)),
        }
    }

    fn prune(&self, catalog: &CatalogResponse) -> CatalogResponse {
        catalog.pruned(self.api_version, self.enable_alpha_features)
    }
}
