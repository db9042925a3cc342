// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for a single Open Service Broker.
//!
//! Every call is one request/response round trip. The client never retries
//! and keeps no record of in-flight operations beyond the [`OperationKey`]
//! it hands back.
//!
//! [`OperationKey`]: crate::types::OperationKey

mod availability;
mod binding;
mod catalog;
mod instance;
mod operation;
pub mod transport;

use crate::cache::CatalogCache;
use crate::config::{AuthConfig, ClientConfiguration};
use crate::error::{Error, OperationNotAllowedError, Result};
use crate::types::*;
use crate::version::APIVersion;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

pub use transport::{HttpService, ResponseBody};

/// Operations a broker client offers, implemented by [`Client`] and by
/// [`crate::fake::FakeClient`] for tests of code that drives a broker.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    async fn get_catalog(&self) -> Result<CatalogResponse>;
    async fn provision_instance(&self, request: &ProvisionRequest) -> Result<ProvisionResponse>;
    async fn update_instance(&self, request: &UpdateInstanceRequest) -> Result<UpdateInstanceResponse>;
    async fn deprovision_instance(&self, request: &DeprovisionRequest) -> Result<DeprovisionResponse>;
    async fn get_instance(&self, request: &GetInstanceRequest) -> Result<GetInstanceResponse>;
    async fn list_instances(&self, request: &ListInstancesRequest) -> Result<ListInstancesResponse>;
    async fn get_operation(&self, request: &GetOperationRequest) -> Result<GetOperationResponse>;
    async fn bind(&self, request: &BindRequest) -> Result<BindResponse>;
    async fn unbind(&self, request: &UnbindRequest) -> Result<UnbindResponse>;
    async fn get_binding(&self, request: &GetBindingRequest) -> Result<GetBindingResponse>;
    async fn check_availability(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Client {
    name: String,
    url: Url,
    api_version: APIVersion,
    auth: Option<AuthConfig>,
    enable_alpha_features: bool,
    health_endpoint: Option<String>,
    catalog_cache: Option<Arc<dyn CatalogCache>>,
    // Serialises read-check-fetch-store on the catalog cache
    catalog_lock: Arc<Mutex<()>>,
    service: HttpService,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("name", &self.name)
            .field("url", &self.url.as_str())
            .field("api_version", &self.api_version)
            .field("auth", &self.auth)
            .field("enable_alpha_features", &self.enable_alpha_features)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client that talks HTTP(S) to the configured broker URL
    pub fn new(config: ClientConfiguration) -> Result<Self> {
        let service = transport::https_service(config.timeout);
        Self::with_service(config, service)
    }

    /// Create a client on top of a caller-supplied HTTP service
    pub fn with_service(config: ClientConfiguration, service: HttpService) -> Result<Self> {
        let url = Url::parse(&config.url)?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("broker URL {} cannot be a base", url)));
        }

        Ok(Self {
            name: config.name,
            url,
            api_version: config.api_version,
            auth: config.auth,
            enable_alpha_features: config.enable_alpha_features,
            health_endpoint: config.health_endpoint,
            catalog_cache: config.catalog_cache,
            catalog_lock: Arc::new(Mutex::new(())),
            service,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_version(&self) -> APIVersion {
        self.api_version
    }

    pub fn alpha_features_enabled(&self) -> bool {
        self.enable_alpha_features
    }

    /// Broker URL with `segments` appended as percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("broker URL {} cannot be a base", self.url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn require_version(&self, required: APIVersion) -> Result<()> {
        if self.api_version.at_least(required) {
            Ok(())
        } else {
            Err(OperationNotAllowedError::version_too_low(required, self.api_version).into())
        }
    }

    fn require_alpha(&self, feature: &str) -> Result<()> {
        if self.enable_alpha_features {
            Ok(())
        } else {
            Err(OperationNotAllowedError::alpha_features_disabled(feature).into())
        }
    }

    /// Gate the optional fields shared by instance and binding requests
    fn validate_common(
        &self,
        context: Option<&serde_json::Map<String, serde_json::Value>>,
        identity: Option<&OriginatingIdentity>,
    ) -> Result<()> {
        if context.is_some() {
            self.require_version(APIVersion::v2_12())?;
        }
        if identity.is_some() {
            self.require_version(APIVersion::v2_13())?;
        }
        Ok(())
    }
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        Err(Error::InvalidRequest(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[async_trait]
impl BrokerClient for Client {
    async fn get_catalog(&self) -> Result<CatalogResponse> {
        Client::get_catalog(self).await
    }

    async fn provision_instance(&self, request: &ProvisionRequest) -> Result<ProvisionResponse> {
        Client::provision_instance(self, request).await
    }

    async fn update_instance(&self, request: &UpdateInstanceRequest) -> Result<UpdateInstanceResponse> {
        Client::update_instance(self, request).await
    }

    async fn deprovision_instance(&self, request: &DeprovisionRequest) -> Result<DeprovisionResponse> {
        Client::deprovision_instance(self, request).await
    }

    async fn get_instance(&self, request: &GetInstanceRequest) -> Result<GetInstanceResponse> {
        Client::get_instance(self, request).await
    }

    async fn list_instances(&self, request: &ListInstancesRequest) -> Result<ListInstancesResponse> {
        Client::list_instances(self, request).await
    }

    async fn get_operation(&self, request: &GetOperationRequest) -> Result<GetOperationResponse> {
        Client::get_operation(self, request).await
    }

    async fn bind(&self, request: &BindRequest) -> Result<BindResponse> {
        Client::bind(self, request).await
    }

    async fn unbind(&self, request: &UnbindRequest) -> Result<UnbindResponse> {
        Client::unbind(self, request).await
    }

    async fn get_binding(&self, request: &GetBindingRequest) -> Result<GetBindingResponse> {
        Client::get_binding(self, request).await
    }

    async fn check_availability(&self) -> Result<()> {
        Client::check_availability(self).await
    }
}
