// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client for the Open Service Broker API.
//!
//! A [`Client`] talks to one broker over HTTP: it reads the catalog,
//! provisions, updates and deprovisions instances, binds and unbinds, and
//! polls asynchronous operations. Requests that the negotiated
//! [`APIVersion`] or the alpha feature switch cannot express are refused
//! before anything is sent.

pub mod cache;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod fake;
pub mod kubernetes;
pub mod types;
pub mod version;

#[cfg(test)]
mod test_utils;

pub use cache::{CatalogCache, InMemoryCatalogCache};
pub use client::{BrokerClient, Client};
pub use config::{AuthConfig, ClientConfiguration};
pub use error::{
    error_as, is_app_guid_required_error, is_async_required_error, is_concurrency_error,
    is_conflict_error, is_gone_error, is_http_error, Error, HttpStatusCodeError, Result,
};
pub use version::{api_versions, latest_api_version, APIVersion};
