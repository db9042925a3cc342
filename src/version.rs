// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Open Service Broker API versions supported by this client.
//!
//! Versions are compared by their ordinal, never by label: "2.9" would sort
//! after "2.14" as a string.

use crate::error::{Error, Result};
use std::fmt;

/// A released OSB API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct APIVersion {
    ordinal: u8,
    label: &'static str,
}

const VERSION_2_11: APIVersion = APIVersion { ordinal: 0, label: "2.11" };
const VERSION_2_12: APIVersion = APIVersion { ordinal: 1, label: "2.12" };
const VERSION_2_13: APIVersion = APIVersion { ordinal: 2, label: "2.13" };
const VERSION_2_14: APIVersion = APIVersion { ordinal: 3, label: "2.14" };

const ALL_VERSIONS: [APIVersion; 4] = [VERSION_2_11, VERSION_2_12, VERSION_2_13, VERSION_2_14];

impl APIVersion {
    pub const fn v2_11() -> Self {
        VERSION_2_11
    }

    pub const fn v2_12() -> Self {
        VERSION_2_12
    }

    pub const fn v2_13() -> Self {
        VERSION_2_13
    }

    pub const fn v2_14() -> Self {
        VERSION_2_14
    }

    /// The newest version this client speaks
    pub const fn latest() -> Self {
        VERSION_2_14
    }

    /// All supported versions, oldest first
    pub fn all() -> &'static [APIVersion] {
        &ALL_VERSIONS
    }

    /// Look up a supported version by its header label, e.g. "2.13"
    pub fn parse(label: &str) -> Result<Self> {
        ALL_VERSIONS
            .iter()
            .find(|v| v.label == label.trim())
            .copied()
            .ok_or_else(|| Error::Config(format!("unsupported broker API version: {}", label)))
    }

    /// The value sent in the `X-Broker-API-Version` header
    pub fn header_value(&self) -> &'static str {
        self.label
    }

    pub fn at_least(&self, other: APIVersion) -> bool {
        self.ordinal >= other.ordinal
    }

    pub fn is_less_than(&self, other: APIVersion) -> bool {
        self.ordinal < other.ordinal
    }
}

impl Default for APIVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for APIVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Newest supported version, see [`APIVersion::latest`]
pub fn latest_api_version() -> APIVersion {
    APIVersion::latest()
}

/// Every supported version, oldest first
pub fn api_versions() -> &'static [APIVersion] {
    APIVersion::all()
}
