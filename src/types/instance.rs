// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service instance requests and responses.
//!
//! `*Request` types are what callers build; the `*Body` types are the JSON
//! the broker sees. Identifiers travel in the URL, flags in the query string.

use crate::types::catalog::MaintenanceInfo;
use crate::types::identity::OriginatingIdentity;
use crate::types::operation::OperationKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProvisionRequest {
    pub instance_id: String,
    pub accepts_incomplete: bool,
    pub service_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    pub parameters: Option<Map<String, Value>>,
    /// Requires API version 2.12
    pub context: Option<Map<String, Value>>,
    /// Requires API version 2.13
    pub originating_identity: Option<OriginatingIdentity>,
}

#[derive(Serialize)]
pub(crate) struct ProvisionRequestBody<'a> {
    pub service_id: &'a str,
    pub plan_id: &'a str,
    pub organization_guid: &'a str,
    pub space_guid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a Map<String, Value>>,
}

impl<'a> From<&'a ProvisionRequest> for ProvisionRequestBody<'a> {
    fn from(r: &'a ProvisionRequest) -> Self {
        Self {
            service_id: &r.service_id,
            plan_id: &r.plan_id,
            organization_guid: &r.organization_guid,
            space_guid: &r.space_guid,
            parameters: r.parameters.as_ref(),
            context: r.context.as_ref(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProvisionResponse {
    pub is_async: bool,
    pub dashboard_url: Option<String>,
    /// Always set when `is_async` is true
    pub operation_key: Option<OperationKey>,
}

/// Success body shared by provision and update
#[derive(Deserialize, Default)]
pub(crate) struct InstanceOperationBody {
    #[serde(default)]
    pub dashboard_url: Option<String>,
    #[serde(default)]
    pub operation: Option<OperationKey>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateInstanceRequest {
    pub instance_id: String,
    pub accepts_incomplete: bool,
    pub service_id: String,
    /// `None` keeps the current plan
    pub plan_id: Option<String>,
    pub parameters: Option<Map<String, Value>>,
    pub previous_values: Option<PreviousValues>,
    /// Requires API version 2.12
    pub context: Option<Map<String, Value>>,
    /// Requires alpha features
    pub maintenance_info: Option<MaintenanceInfo>,
    /// Requires API version 2.13
    pub originating_identity: Option<OriginatingIdentity>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PreviousValues {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
}

#[derive(Serialize)]
pub(crate) struct UpdateInstanceRequestBody<'a> {
    pub service_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_values: Option<&'a PreviousValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<&'a MaintenanceInfo>,
}

impl<'a> From<&'a UpdateInstanceRequest> for UpdateInstanceRequestBody<'a> {
    fn from(r: &'a UpdateInstanceRequest) -> Self {
        Self {
            service_id: &r.service_id,
            plan_id: r.plan_id.as_deref(),
            parameters: r.parameters.as_ref(),
            previous_values: r.previous_values.as_ref(),
            context: r.context.as_ref(),
            maintenance_info: r.maintenance_info.as_ref(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateInstanceResponse {
    pub is_async: bool,
    pub dashboard_url: Option<String>,
    pub operation_key: Option<OperationKey>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeprovisionRequest {
    pub instance_id: String,
    pub accepts_incomplete: bool,
    pub service_id: String,
    pub plan_id: String,
    pub originating_identity: Option<OriginatingIdentity>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeprovisionResponse {
    pub is_async: bool,
    pub operation_key: Option<OperationKey>,
}

#[derive(Deserialize, Default)]
pub(crate) struct AsyncOperationBody {
    #[serde(default)]
    pub operation: Option<OperationKey>,
}

/// Fetch a single instance. Requires API version 2.14.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetInstanceRequest {
    pub instance_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GetInstanceResponse {
    pub service_id: String,
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_info: Option<MaintenanceInfo>,
}

/// List instances page by page. Requires API version 2.14.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListInstancesRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ListInstancesResponse {
    #[serde(default)]
    pub instances: Vec<InstanceSummary>,
    /// Absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct InstanceSummary {
    pub instance_id: String,
    pub service_id: String,
    pub plan_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
}
