// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::Client;
use crate::constants::paths;
use crate::error::{AvailabilityInvalidStatusError, Result};
use http::{Method, StatusCode};
use tracing::{instrument, warn};

impl Client {
    /// Probe the broker with a HEAD request to its health endpoint. Only a
    /// 200 counts as available.
    #[instrument(skip(self), fields(broker = %self.name))]
    pub async fn check_availability(&self) -> Result<()> {
        let endpoint = self
            .health_endpoint
            .as_deref()
            .unwrap_or(paths::DEFAULT_HEALTH_ENDPOINT);
        let segments: Vec<&str> = endpoint.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.endpoint(&segments)?;

        let response = self.send(Method::HEAD, url, &[], None).await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => {
                warn!("Broker {} is unavailable, status {}", self.name, status);
                Err(AvailabilityInvalidStatusError {
                    status_code: status.as_u16(),
                }
                .into())
            }
        }
    }
}
