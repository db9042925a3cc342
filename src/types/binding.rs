// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service binding requests and responses.

use crate::types::identity::OriginatingIdentity;
use crate::types::operation::OperationKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindRequest {
    pub binding_id: String,
    pub instance_id: String,
    /// Requires alpha features
    pub accepts_incomplete: bool,
    pub service_id: String,
    pub plan_id: String,
    pub app_guid: Option<String>,
    pub bind_resource: Option<BindResource>,
    pub parameters: Option<Map<String, Value>>,
    /// Requires API version 2.12
    pub context: Option<Map<String, Value>>,
    /// Requires API version 2.13
    pub originating_identity: Option<OriginatingIdentity>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BindResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct BindRequestBody<'a> {
    pub service_id: &'a str,
    pub plan_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_guid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_resource: Option<&'a BindResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<&'a Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<&'a Map<String, Value>>,
}

impl<'a> From<&'a BindRequest> for BindRequestBody<'a> {
    fn from(r: &'a BindRequest) -> Self {
        Self {
            service_id: &r.service_id,
            plan_id: &r.plan_id,
            app_guid: r.app_guid.as_deref(),
            bind_resource: r.bind_resource.as_ref(),
            parameters: r.parameters.as_ref(),
            context: r.context.as_ref(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BindResponse {
    pub is_async: bool,
    pub credentials: Option<Map<String, Value>>,
    pub syslog_drain_url: Option<String>,
    pub route_service_url: Option<String>,
    pub volume_mounts: Option<Vec<Value>>,
    pub operation_key: Option<OperationKey>,
}

/// Success body shared by bind and get-binding
#[derive(Deserialize, Default)]
pub(crate) struct BindingBody {
    #[serde(default)]
    pub credentials: Option<Map<String, Value>>,
    #[serde(default)]
    pub syslog_drain_url: Option<String>,
    #[serde(default)]
    pub route_service_url: Option<String>,
    #[serde(default)]
    pub volume_mounts: Option<Vec<Value>>,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
    #[serde(default)]
    pub operation: Option<OperationKey>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnbindRequest {
    pub instance_id: String,
    pub binding_id: String,
    /// Requires alpha features
    pub accepts_incomplete: bool,
    pub service_id: String,
    pub plan_id: String,
    pub originating_identity: Option<OriginatingIdentity>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnbindResponse {
    pub is_async: bool,
    pub operation_key: Option<OperationKey>,
}

/// Fetch a single binding. Requires API version 2.14.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetBindingRequest {
    pub instance_id: String,
    pub binding_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetBindingResponse {
    pub credentials: Option<Map<String, Value>>,
    pub syslog_drain_url: Option<String>,
    pub route_service_url: Option<String>,
    pub volume_mounts: Option<Vec<Value>>,
    pub parameters: Option<Map<String, Value>>,
}

/// Binding credentials tagged with the binding they were issued for.
///
/// `guid_at_tenant` has the form `<binding_id>@<tenant>`, so credentials
/// copied elsewhere can still be traced back to the requesting binding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credential {
    pub values: Map<String, Value>,
    pub guid_at_tenant: String,
}

impl Credential {
    pub fn new(binding_id: &str, tenant: &str, values: Map<String, Value>) -> Self {
        Self {
            values,
            guid_at_tenant: format!("{}@{}", binding_id, tenant),
        }
    }

    /// `None` when the broker returned no credentials, e.g. for async binds
    pub fn from_bind_response(binding_id: &str, tenant: &str, response: &BindResponse) -> Option<Self> {
        response
            .credentials
            .as_ref()
            .map(|values| Self::new(binding_id, tenant, values.clone()))
    }

    pub fn binding_id(&self) -> &str {
        self.guid_at_tenant
            .split_once('@')
            .map_or(self.guid_at_tenant.as_str(), |(guid, _)| guid)
    }

    pub fn belongs_to(&self, binding_id: &str) -> bool {
        self.binding_id() == binding_id
    }
}
