// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Provision, update, deprovision and read service instances.

use super::transport::{accepts_incomplete_query, decode, handle_failure_response, BrokerResponse};
use super::{required, Client};
use crate::constants::{paths, query};
use crate::error::Result;
use crate::types::instance::{
    AsyncOperationBody, InstanceOperationBody, ProvisionRequestBody, UpdateInstanceRequestBody,
};
use crate::types::*;
use crate::version::APIVersion;
use http::header::LOCATION;
use http::{Method, StatusCode};
use tracing::{info, instrument};
use url::Url;

impl Client {
    fn instance_url(&self, instance_id: &str) -> Result<Url> {
        self.endpoint(&[paths::V2, paths::SERVICE_INSTANCES, instance_id])
    }

    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id))]
    pub async fn provision_instance(&self, request: &ProvisionRequest) -> Result<ProvisionResponse> {
        required("instance_id", &request.instance_id)?;
        required("service_id", &request.service_id)?;
        required("plan_id", &request.plan_id)?;
        required("organization_guid", &request.organization_guid)?;
        required("space_guid", &request.space_guid)?;
        self.validate_common(request.context.as_ref(), request.originating_identity.as_ref())?;

        let response = self
            .send_json(
                Method::PUT,
                self.instance_url(&request.instance_id)?,
                &accepts_incomplete_query(request.accepts_incomplete),
                &ProvisionRequestBody::from(request),
                request.originating_identity.as_ref(),
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body: InstanceOperationBody = decode(&response)?;
                Ok(ProvisionResponse {
                    is_async: false,
                    dashboard_url: body.dashboard_url,
                    operation_key: None,
                })
            }
            StatusCode::ACCEPTED => {
                let body: InstanceOperationBody = decode(&response)?;
                let operation_key = operation_key(body.operation, &response);
                info!(operation = %operation_key, "Broker accepted provision asynchronously");
                Ok(ProvisionResponse {
                    is_async: true,
                    dashboard_url: body.dashboard_url,
                    operation_key: Some(operation_key),
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }

    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id))]
    pub async fn update_instance(
        &self,
        request: &UpdateInstanceRequest,
    ) -> Result<UpdateInstanceResponse> {
        required("instance_id", &request.instance_id)?;
        required("service_id", &request.service_id)?;
        self.validate_common(request.context.as_ref(), request.originating_identity.as_ref())?;
        if request.maintenance_info.is_some() {
            self.require_alpha("maintenance_info")?;
        }

        let response = self
            .send_json(
                Method::PATCH,
                self.instance_url(&request.instance_id)?,
                &accepts_incomplete_query(request.accepts_incomplete),
                &UpdateInstanceRequestBody::from(request),
                request.originating_identity.as_ref(),
            )
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: InstanceOperationBody = decode(&response)?;
                Ok(UpdateInstanceResponse {
                    is_async: false,
                    dashboard_url: body.dashboard_url,
                    operation_key: None,
                })
            }
            StatusCode::ACCEPTED => {
                let body: InstanceOperationBody = decode(&response)?;
                let operation_key = operation_key(body.operation, &response);
                info!(operation = %operation_key, "Broker accepted update asynchronously");
                Ok(UpdateInstanceResponse {
                    is_async: true,
                    dashboard_url: body.dashboard_url,
                    operation_key: Some(operation_key),
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }

    /// Deprovision an instance. 410 Gone counts as success: the instance
    /// is already absent.
    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id))]
    pub async fn deprovision_instance(
        &self,
        request: &DeprovisionRequest,
    ) -> Result<DeprovisionResponse> {
        required("instance_id", &request.instance_id)?;
        required("service_id", &request.service_id)?;
        required("plan_id", &request.plan_id)?;
        self.validate_common(None, request.originating_identity.as_ref())?;

        let mut params = vec![
            (query::SERVICE_ID, request.service_id.clone()),
            (query::PLAN_ID, request.plan_id.clone()),
        ];
        params.extend(accepts_incomplete_query(request.accepts_incomplete));

        let response = self
            .send(
                Method::DELETE,
                self.instance_url(&request.instance_id)?,
                &params,
                request.originating_identity.as_ref(),
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::GONE => Ok(DeprovisionResponse::default()),
            StatusCode::ACCEPTED => {
                let body: AsyncOperationBody = decode(&response)?;
                let operation_key = operation_key(body.operation, &response);
                info!(operation = %operation_key, "Broker accepted deprovision asynchronously");
                Ok(DeprovisionResponse {
                    is_async: true,
                    operation_key: Some(operation_key),
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }

    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id))]
    pub async fn get_instance(&self, request: &GetInstanceRequest) -> Result<GetInstanceResponse> {
        self.require_version(APIVersion::v2_14())?;
        required("instance_id", &request.instance_id)?;

        let response = self
            .send(Method::GET, self.instance_url(&request.instance_id)?, &[], None)
            .await?;

        match response.status() {
            StatusCode::OK => decode(&response),
            _ => Err(handle_failure_response(&response)),
        }
    }

    #[instrument(skip(self), fields(broker = %self.name))]
    pub async fn list_instances(
        &self,
        request: &ListInstancesRequest,
    ) -> Result<ListInstancesResponse> {
        self.require_version(APIVersion::v2_14())?;

        let mut params = Vec::new();
        if let Some(page) = request.page {
            params.push((query::PAGE, page.to_string()));
        }
        if let Some(page_size) = request.page_size {
            params.push((query::PAGE_SIZE, page_size.to_string()));
        }

        let url = self.endpoint(&[paths::V2, paths::SERVICE_INSTANCES])?;
        let response = self.send(Method::GET, url, &params, None).await?;

        match response.status() {
            StatusCode::OK => decode(&response),
            _ => Err(handle_failure_response(&response)),
        }
    }
}

/// Operation key of a 202 response: the body's `operation` field, else the
/// `Location` header, else an empty key for brokers that track a single
/// operation per resource.
pub(super) fn operation_key(from_body: Option<OperationKey>, response: &BrokerResponse) -> OperationKey {
    from_body
        .or_else(|| {
            response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(OperationKey::from)
        })
        .unwrap_or_default()
}
