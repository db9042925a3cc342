// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use super::instance::operation_key;
use super::transport::{accepts_incomplete_query, decode, handle_failure_response};
use super::{required, Client};
use crate::constants::{paths, query};
use crate::error::Result;
use crate::types::binding::{BindRequestBody, BindingBody};
use crate::types::instance::AsyncOperationBody;
use crate::types::*;
use crate::version::APIVersion;
use http::{Method, StatusCode};
use tracing::{info, instrument};
use url::Url;

impl Client {
    fn binding_url(&self, instance_id: &str, binding_id: &str) -> Result<Url> {
        self.endpoint(&[
            paths::V2,
            paths::SERVICE_INSTANCES,
            instance_id,
            paths::SERVICE_BINDINGS,
            binding_id,
        ])
    }

    /// Create a binding. Asynchronous binding is an alpha feature: without
    /// it `accepts_incomplete` is refused up front and a 202 from the broker
    /// is reported as a failure.
    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id, binding = %request.binding_id))]
    pub async fn bind(&self, request: &BindRequest) -> Result<BindResponse> {
        required("binding_id", &request.binding_id)?;
        required("instance_id", &request.instance_id)?;
        required("service_id", &request.service_id)?;
        required("plan_id", &request.plan_id)?;
        self.validate_common(request.context.as_ref(), request.originating_identity.as_ref())?;
        if request.accepts_incomplete {
            self.require_alpha("asynchronous bindings")?;
        }

        let response = self
            .send_json(
                Method::PUT,
                self.binding_url(&request.instance_id, &request.binding_id)?,
                &accepts_incomplete_query(request.accepts_incomplete),
                &BindRequestBody::from(request),
                request.originating_identity.as_ref(),
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body: BindingBody = decode(&response)?;
                Ok(BindResponse {
                    is_async: false,
                    credentials: body.credentials,
                    syslog_drain_url: body.syslog_drain_url,
                    route_service_url: body.route_service_url,
                    volume_mounts: body.volume_mounts,
                    operation_key: None,
                })
            }
            StatusCode::ACCEPTED if self.enable_alpha_features => {
                let body: BindingBody = decode(&response)?;
                let operation_key = operation_key(body.operation, &response);
                info!(operation = %operation_key, "Broker accepted bind asynchronously");
                Ok(BindResponse {
                    is_async: true,
                    operation_key: Some(operation_key),
                    ..Default::default()
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }

    /// Delete a binding. 410 Gone counts as success.
    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id, binding = %request.binding_id))]
    pub async fn unbind(&self, request: &UnbindRequest) -> Result<UnbindResponse> {
        required("instance_id", &request.instance_id)?;
        required("binding_id", &request.binding_id)?;
        required("service_id", &request.service_id)?;
        required("plan_id", &request.plan_id)?;
        self.validate_common(None, request.originating_identity.as_ref())?;
        if request.accepts_incomplete {
            self.require_alpha("asynchronous bindings")?;
        }

        let mut params = vec![
            (query::SERVICE_ID, request.service_id.clone()),
            (query::PLAN_ID, request.plan_id.clone()),
        ];
        params.extend(accepts_incomplete_query(request.accepts_incomplete));

        let response = self
            .send(
                Method::DELETE,
                self.binding_url(&request.instance_id, &request.binding_id)?,
                &params,
                request.originating_identity.as_ref(),
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::GONE => Ok(UnbindResponse::default()),
            StatusCode::ACCEPTED if self.enable_alpha_features => {
                let body: AsyncOperationBody = decode(&response)?;
                let operation_key = operation_key(body.operation, &response);
                info!(operation = %operation_key, "Broker accepted unbind asynchronously");
                Ok(UnbindResponse {
                    is_async: true,
                    operation_key: Some(operation_key),
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }

    #[instrument(skip(self, request), fields(broker = %self.name, instance = %request.instance_id, binding = %request.binding_id))]
    pub async fn get_binding(&self, request: &GetBindingRequest) -> Result<GetBindingResponse> {
        self.require_version(APIVersion::v2_14())?;
        required("instance_id", &request.instance_id)?;
        required("binding_id", &request.binding_id)?;

        let response = self
            .send(
                Method::GET,
                self.binding_url(&request.instance_id, &request.binding_id)?,
                &[],
                None,
            )
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: BindingBody = decode(&response)?;
                Ok(GetBindingResponse {
                    credentials: body.credentials,
                    syslog_drain_url: body.syslog_drain_url,
                    route_service_url: body.route_service_url,
                    volume_mounts: body.volume_mounts,
                    parameters: body.parameters,
                })
            }
            _ => Err(handle_failure_response(&response)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfiguration;
    use crate::constants::broker_errors;
    use crate::error::{
        is_app_guid_required_error, is_async_required_error, is_gone_error, is_http_error, Error,
    };
    use crate::test_utils::MockBroker;
    use crate::types::*;
    use crate::version::APIVersion;
    use serde_json::json;

    const BINDING_PATH: &str = "/v2/service_instances/inst-1/service_bindings/bind-1";

    fn bind_request() -> BindRequest {
        BindRequest {
            binding_id: "bind-1".to_string(),
            instance_id: "inst-1".to_string(),
            service_id: "svc-1".to_string(),
            plan_id: "plan-1".to_string(),
            app_guid: Some("app-1".to_string()),
            ..Default::default()
        }
    }

    fn unbind_request() -> UnbindRequest {
        UnbindRequest {
            instance_id: "inst-1".to_string(),
            binding_id: "bind-1".to_string(),
            service_id: "svc-1".to_string(),
            plan_id: "plan-1".to_string(),
            ..Default::default()
        }
    }

    fn config(alpha: bool) -> ClientConfiguration {
        ClientConfiguration::new("http://broker.test").with_alpha_features(alpha)
    }

    #[tokio::test]
    async fn test_bind_returns_credentials() {
        let broker = MockBroker::new().on(
            "PUT",
            BINDING_PATH,
            201,
            r#"{"credentials":{"uri":"redis://x"},"syslog_drain_url":"syslog://d"}"#,
        );
        let client = broker.clone().into_client(config(false));

        let response = client.bind(&bind_request()).await.unwrap();
        assert!(!response.is_async);
        assert_eq!(response.credentials.unwrap()["uri"], "redis://x");
        assert_eq!(response.syslog_drain_url.as_deref(), Some("syslog://d"));

        let body: serde_json::Value = serde_json::from_slice(&broker.requests()[0].body).unwrap();
        assert_eq!(body["app_guid"], "app-1");
    }

    #[tokio::test]
    async fn test_bind_app_guid_required() {
        let body = json!({
            "error": broker_errors::APP_GUID_REQUIRED_MESSAGE,
            "description": broker_errors::APP_GUID_REQUIRED_DESCRIPTION,
        })
        .to_string();
        let broker = MockBroker::new().on("PUT", BINDING_PATH, 422, &body);
        let client = broker.into_client(config(false));

        let mut request = bind_request();
        request.app_guid = None;
        let err = client.bind(&request).await.unwrap_err();
        assert!(is_app_guid_required_error(&err));
        assert!(!is_async_required_error(&err));
    }

    #[tokio::test]
    async fn test_async_bind_requires_alpha() {
        let broker = MockBroker::new();
        let client = broker.clone().into_client(config(false));

        let mut request = bind_request();
        request.accepts_incomplete = true;
        let err = client.bind(&request).await.unwrap_err();
        assert!(matches!(err, Error::OperationNotAllowed(_)));
        assert_eq!(broker.request_count(), 0);
    }

    #[tokio::test]
    async fn test_async_bind_with_alpha() {
        let broker = MockBroker::new().on("PUT", BINDING_PATH, 202, r#"{"operation":"bind-op"}"#);
        let client = broker.clone().into_client(config(true));

        let mut request = bind_request();
        request.accepts_incomplete = true;
        let response = client.bind(&request).await.unwrap();
        assert!(response.is_async);
        assert!(response.credentials.is_none());
        assert_eq!(response.operation_key, Some(OperationKey::from("bind-op")));
        assert_eq!(
            broker.requests()[0].query.as_deref(),
            Some("accepts_incomplete=true")
        );
    }

    #[tokio::test]
    async fn test_unexpected_accepted_bind_without_alpha_is_failure() {
        let broker = MockBroker::new().on("PUT", BINDING_PATH, 202, "{}");
        let client = broker.into_client(config(false));

        let err = client.bind(&bind_request()).await.unwrap_err();
        assert_eq!(is_http_error(&err).unwrap().status_code, 202);
    }

    #[tokio::test]
    async fn test_unbind_accepts_ok_and_gone() {
        for status in [200, 410] {
            let broker = MockBroker::new().on("DELETE", BINDING_PATH, status, "{}");
            let client = broker.clone().into_client(config(false));

            let response = client.unbind(&unbind_request()).await.unwrap();
            assert!(!response.is_async);
            assert_eq!(
                broker.requests()[0].query.as_deref(),
                Some("service_id=svc-1&plan_id=plan-1")
            );
        }
    }

    #[tokio::test]
    async fn test_unbind_async_with_alpha() {
        let broker = MockBroker::new().on("DELETE", BINDING_PATH, 202, r#"{"operation":"unbind-op"}"#);
        let client = broker.into_client(config(true));

        let mut request = unbind_request();
        request.accepts_incomplete = true;
        let response = client.unbind(&request).await.unwrap();
        assert!(response.is_async);
        assert_eq!(response.operation_key, Some(OperationKey::from("unbind-op")));
    }

    #[tokio::test]
    async fn test_get_binding() {
        let broker = MockBroker::new().on(
            "GET",
            BINDING_PATH,
            200,
            r#"{"credentials":{"uri":"redis://x"},"parameters":{"ttl":60}}"#,
        );
        let client = broker.into_client(config(false));

        let binding = client
            .get_binding(&GetBindingRequest {
                instance_id: "inst-1".to_string(),
                binding_id: "bind-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(binding.credentials.unwrap()["uri"], "redis://x");
        assert_eq!(binding.parameters.unwrap()["ttl"], 60);
    }

    #[tokio::test]
    async fn test_get_binding_gone_and_version_gate() {
        let request = GetBindingRequest {
            instance_id: "inst-1".to_string(),
            binding_id: "bind-1".to_string(),
        };

        let broker = MockBroker::new().on("GET", BINDING_PATH, 410, "{}");
        let client = broker.into_client(config(false));
        let err = client.get_binding(&request).await.unwrap_err();
        assert!(is_gone_error(&err));

        let broker = MockBroker::new();
        let client = broker
            .clone()
            .into_client(config(false).with_api_version(APIVersion::v2_13()));
        assert!(client.get_binding(&request).await.is_err());
        assert_eq!(broker.request_count(), 0);
    }
}
