// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// The platform user on whose behalf a request is made, sent in the
/// `X-Broker-API-Originating-Identity` header. Requires API version 2.13.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OriginatingIdentity {
    /// Platform name, e.g. "kubernetes" or "cloudfoundry"
    pub platform: String,
    /// Platform-specific JSON object describing the user
    pub value: String,
}

impl OriginatingIdentity {
    pub fn new(platform: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            value: value.into(),
        }
    }

    pub fn header_value(&self) -> String {
        format!("{} {}", self.platform, STANDARD.encode(self.value.as_bytes()))
    }
}
