// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::transport::{decode_required, handle_failure_response, BrokerResponse};
use super::{required, Client};
use crate::constants::{paths, query};
use crate::error::Result;
use crate::types::operation::LastOperationBody;
use crate::types::{GetOperationRequest, GetOperationResponse};
use crate::version::APIVersion;
use http::header::RETRY_AFTER;
use http::{Method, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

impl Client {
    /// Poll the last operation of an instance, or of a binding when the
    /// request names one.
    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id))]
    pub async fn get_operation(&self, request: &GetOperationRequest) -> Result<GetOperationResponse> {
        required("instance_id", &request.instance_id)?;

        let url = match &request.binding_id {
            Some(binding_id) => {
                self.require_version(APIVersion::v2_14())?;
                required("binding_id", binding_id)?;
                self.endpoint(&[
                    paths::V2,
                    paths::SERVICE_INSTANCES,
                    &request.instance_id,
                    paths::SERVICE_BINDINGS,
                    binding_id,
                    paths::LAST_OPERATION,
                ])?
            }
            None => self.endpoint(&[
                paths::V2,
                paths::SERVICE_INSTANCES,
                &request.instance_id,
                paths::LAST_OPERATION,
            ])?,
        };

        let mut params = Vec::new();
        if let Some(service_id) = &request.service_id {
            params.push((query::SERVICE_ID, service_id.clone()));
        }
        if let Some(plan_id) = &request.plan_id {
            params.push((query::PLAN_ID, plan_id.clone()));
        }
        if let Some(key) = request.operation_key.as_ref().filter(|k| !k.is_empty()) {
            params.push((query::OPERATION, key.to_string()));
        }

        let response = self.send(Method::GET, url, &params, None).await?;

        match response.status() {
            StatusCode::OK => {
                // The state field is mandatory, so no empty-body default here
                let body: LastOperationBody = decode_required(&response)?;
                debug!(state = %body.state, "Polled last operation");
                Ok(GetOperationResponse {
                    state: body.state,
                    description: body.description,
                    poll_delay: retry_after(&response),
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }
}

/// `Retry-After` in delay-seconds form. HTTP-dates are ignored.
fn retry_after(response: &BrokerResponse) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
