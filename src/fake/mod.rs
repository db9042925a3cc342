// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for code that drives a broker through [`BrokerClient`].
//!
//! [`FakeClient`] records every call as an [`Action`] and answers with the
//! [`Reaction`] configured for that operation. Operations without a reaction
//! fail with `Error::InvalidRequest("unexpected action")`.

mod generator;
mod reaction;

pub use generator::CatalogGenerator;
pub use reaction::Reaction;

use crate::client::BrokerClient;
use crate::error::{Error, Result};
use crate::types::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

pub const UNEXPECTED_ACTION: &str = "unexpected action";

/// A call made against a [`FakeClient`], with the request it carried
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    GetCatalog,
    ProvisionInstance(ProvisionRequest),
    UpdateInstance(UpdateInstanceRequest),
    DeprovisionInstance(DeprovisionRequest),
    GetInstance(GetInstanceRequest),
    ListInstances(ListInstancesRequest),
    GetOperation(GetOperationRequest),
    Bind(BindRequest),
    Unbind(UnbindRequest),
    GetBinding(GetBindingRequest),
    CheckAvailability,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetCatalog => "GetCatalog",
            Action::ProvisionInstance(_) => "ProvisionInstance",
            Action::UpdateInstance(_) => "UpdateInstance",
            Action::DeprovisionInstance(_) => "DeprovisionInstance",
            Action::GetInstance(_) => "GetInstance",
            Action::ListInstances(_) => "ListInstances",
            Action::GetOperation(_) => "GetOperation",
            Action::Bind(_) => "Bind",
            Action::Unbind(_) => "Unbind",
            Action::GetBinding(_) => "GetBinding",
            Action::CheckAvailability => "CheckAvailability",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct FakeClientConfiguration {
    pub catalog: Option<Reaction<(), CatalogResponse>>,
    pub provision: Option<Reaction<ProvisionRequest, ProvisionResponse>>,
    pub update: Option<Reaction<UpdateInstanceRequest, UpdateInstanceResponse>>,
    pub deprovision: Option<Reaction<DeprovisionRequest, DeprovisionResponse>>,
    pub get_instance: Option<Reaction<GetInstanceRequest, GetInstanceResponse>>,
    pub list_instances: Option<Reaction<ListInstancesRequest, ListInstancesResponse>>,
    pub get_operation: Option<Reaction<GetOperationRequest, GetOperationResponse>>,
    pub bind: Option<Reaction<BindRequest, BindResponse>>,
    pub unbind: Option<Reaction<UnbindRequest, UnbindResponse>>,
    pub get_binding: Option<Reaction<GetBindingRequest, GetBindingResponse>>,
    pub availability: Option<Reaction<(), ()>>,
}

#[derive(Clone, Debug, Default)]
pub struct FakeClient {
    config: FakeClientConfiguration,
    actions: Arc<Mutex<Vec<Action>>>,
}

impl FakeClient {
    pub fn new(config: FakeClientConfiguration) -> Self {
        Self {
            config,
            actions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call made so far, oldest first
    pub fn actions(&self) -> Vec<Action> {
        self.log().clone()
    }

    pub fn clear_actions(&self) {
        self.log().clear();
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<Action>> {
        // A panicking reaction cannot leave the log half-written
        self.actions
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn react<Req, Resp>(
        &self,
        action: Action,
        reaction: &Option<Reaction<Req, Resp>>,
        request: &Req,
    ) -> Result<Resp> {
        debug!("Fake broker received {}", action.name());
        self.log().push(action);
        match reaction {
            Some(reaction) => reaction.react(request),
            None => Err(Error::InvalidRequest(UNEXPECTED_ACTION.to_string())),
        }
    }
}

#[async_trait]
impl BrokerClient for FakeClient {
    async fn get_catalog(&self) -> Result<CatalogResponse> {
        self.react(Action::GetCatalog, &self.config.catalog, &())
    }

    async fn provision_instance(&self, request: &ProvisionRequest) -> Result<ProvisionResponse> {
        self.react(
            Action::ProvisionInstance(request.clone()),
            &self.config.provision,
            request,
        )
    }

    async fn update_instance(&self, request: &UpdateInstanceRequest) -> Result<UpdateInstanceResponse> {
        self.react(Action::UpdateInstance(request.clone()), &self.config.update, request)
    }

    async fn deprovision_instance(&self, request: &DeprovisionRequest) -> Result<DeprovisionResponse> {
        self.react(
            Action::DeprovisionInstance(request.clone()),
            &self.config.deprovision,
            request,
        )
    }

    async fn get_instance(&self, request: &GetInstanceRequest) -> Result<GetInstanceResponse> {
        self.react(Action::GetInstance(request.clone()), &self.config.get_instance, request)
    }

    async fn list_instances(&self, request: &ListInstancesRequest) -> Result<ListInstancesResponse> {
        self.react(
            Action::ListInstances(request.clone()),
            &self.config.list_instances,
            request,
        )
    }

    async fn get_operation(&self, request: &GetOperationRequest) -> Result<GetOperationResponse> {
        self.react(
            Action::GetOperation(request.clone()),
            &self.config.get_operation,
            request,
        )
    }

    async fn bind(&self, request: &BindRequest) -> Result<BindResponse> {
        self.react(Action::Bind(request.clone()), &self.config.bind, request)
    }

    async fn unbind(&self, request: &UnbindRequest) -> Result<UnbindResponse> {
        self.react(Action::Unbind(request.clone()), &self.config.unbind, request)
    }

    async fn get_binding(&self, request: &GetBindingRequest) -> Result<GetBindingResponse> {
        self.react(Action::GetBinding(request.clone()), &self.config.get_binding, request)
    }

    async fn check_availability(&self) -> Result<()> {
        self.react(Action::CheckAvailability, &self.config.availability, &())
    }
}
