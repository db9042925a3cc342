// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::cache::CatalogCache;
use crate::version::APIVersion;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Credentials presented to the broker on every request
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl AuthConfig {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        AuthConfig::Bearer {
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            AuthConfig::Basic { username, password } => {
                format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
            }
            AuthConfig::Bearer { token } => format!("Bearer {}", token),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthConfig::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Everything a [`crate::Client`] needs to talk to one broker
#[derive(Clone, Debug)]
pub struct ClientConfiguration {
    /// Used in log output only
    pub name: String,
    pub url: String,
    pub api_version: APIVersion,
    pub auth: Option<AuthConfig>,
    pub enable_alpha_features: bool,
    /// Per-request timeout enforced by the transport
    pub timeout: Option<Duration>,
    /// Path probed by `check_availability`, defaults to `/v2/service_instances`
    pub health_endpoint: Option<String>,
    pub catalog_cache: Option<Arc<dyn CatalogCache>>,
}

impl ClientConfiguration {
    /// Latest API version, no auth, alpha features off. No timeout is set:
    /// bound requests with `timeout` or by dropping the returned future.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: "osb-client".to_string(),
            url: url.into(),
            api_version: APIVersion::latest(),
            auth: None,
            enable_alpha_features: false,
            timeout: None,
            health_endpoint: None,
            catalog_cache: None,
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_api_version(mut self, api_version: APIVersion) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_alpha_features(mut self, enabled: bool) -> Self {
        self.enable_alpha_features = enabled;
        self
    }

    pub fn with_catalog_cache(mut self, cache: Arc<dyn CatalogCache>) -> Self {
        self.catalog_cache = Some(cache);
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let url = env::var("OSB_BROKER_URL").context("OSB_BROKER_URL environment variable not set")?;
        let mut config = Self::new(url);

        if let Ok(version) = env::var("OSB_API_VERSION") {
            config.api_version = APIVersion::parse(&version)
                .with_context(|| format!("OSB_API_VERSION has unsupported value {}", version))?;
        }

        config.auth = match (
            env::var("OSB_USERNAME"),
            env::var("OSB_PASSWORD"),
            env::var("OSB_BEARER_TOKEN"),
        ) {
            (Ok(username), Ok(password), _) => Some(AuthConfig::basic(username, password)),
            (_, _, Ok(token)) => Some(AuthConfig::bearer(token)),
            _ => None,
        };

        config.enable_alpha_features = env::var("OSB_ENABLE_ALPHA_FEATURES")
            .unwrap_or("false".to_string())
            .parse()
            .unwrap_or(false);

        if let Ok(secs) = env::var("OSB_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("OSB_TIMEOUT_SECS is not a number: {}", secs))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        config.health_endpoint = env::var("OSB_HEALTH_ENDPOINT").ok();

        Ok(config)
    }
}
