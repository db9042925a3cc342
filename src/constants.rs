// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// HTTP headers defined by the OSB API
pub mod headers {
    pub const API_VERSION: &str = "X-Broker-API-Version";
    pub const ORIGINATING_IDENTITY: &str = "X-Broker-API-Originating-Identity";
}

/// Path segments of the broker endpoints, appended to the broker URL
pub mod paths {
    pub const V2: &str = "v2";
    pub const CATALOG: &str = "catalog";
    pub const SERVICE_INSTANCES: &str = "service_instances";
    pub const SERVICE_BINDINGS: &str = "service_bindings";
    pub const LAST_OPERATION: &str = "last_operation";

    /// Probed by `check_availability` unless configured otherwise
    pub const DEFAULT_HEALTH_ENDPOINT: &str = "/v2/service_instances";
}

/// Query parameter names
pub mod query {
    pub const ACCEPTS_INCOMPLETE: &str = "accepts_incomplete";
    pub const SERVICE_ID: &str = "service_id";
    pub const PLAN_ID: &str = "plan_id";
    pub const OPERATION: &str = "operation";
    pub const PAGE: &str = "page";
    pub const PAGE_SIZE: &str = "page_size";
}

/// Well-known broker error codes, carried in the `error` field of a 422 body
pub mod broker_errors {
    pub const ASYNC_REQUIRED_MESSAGE: &str = "AsyncRequired";
    pub const ASYNC_REQUIRED_DESCRIPTION: &str =
        "This service plan requires client support for asynchronous service operations.";

    pub const APP_GUID_REQUIRED_MESSAGE: &str = "RequiresApp";
    pub const APP_GUID_REQUIRED_DESCRIPTION: &str =
        "This service supports generation of credentials through binding an application only.";

    pub const CONCURRENCY_MESSAGE: &str = "ConcurrencyError";
    pub const CONCURRENCY_DESCRIPTION: &str =
        "Another operation for this service instance is in progress.";
}

/// Key under which the catalog is stored in a [`crate::cache::CatalogCache`]
pub const CATALOG_CACHE_KEY: &str = "catalog";
