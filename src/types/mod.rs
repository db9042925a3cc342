// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request and response types of the Open Service Broker API.

pub mod binding;
pub mod catalog;
pub mod identity;
pub mod instance;
pub mod operation;

pub use binding::{
    BindRequest, BindResource, BindResponse, Credential, GetBindingRequest, GetBindingResponse,
    UnbindRequest, UnbindResponse,
};
pub use catalog::{CatalogResponse, MaintenanceInfo, Plan, Schemas, Service};
pub use identity::OriginatingIdentity;
pub use instance::{
    DeprovisionRequest, DeprovisionResponse, GetInstanceRequest, GetInstanceResponse,
    InstanceSummary, ListInstancesRequest, ListInstancesResponse, PreviousValues,
    ProvisionRequest, ProvisionResponse, UpdateInstanceRequest, UpdateInstanceResponse,
};
pub use operation::{GetOperationRequest, GetOperationResponse, OperationKey, OperationState};
