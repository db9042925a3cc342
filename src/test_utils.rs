// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking broker and Kubernetes API responses.

use crate::client::{Client, HttpService, ResponseBody};
use crate::config::ClientConfiguration;
use crate::error::BoxError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{HeaderMap, Method, Request, Response};
use http_body_util::{BodyExt, Full};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::util::BoxCloneSyncService;
use tower::Service;

#[derive(Clone, Debug)]
struct CannedResponse {
    status: u16,
    body: String,
    header: Option<(String, String)>,
}

/// A request as the broker saw it
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// A mock broker that returns canned responses by (method, path) and records
/// every request it receives. Unmatched requests get a 404.
#[derive(Clone, Default)]
pub struct MockBroker {
    responses: Arc<Mutex<HashMap<(String, String), CannedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `method` on the exact `path`
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.insert(method, path, status, body, None)
    }

    /// Like [`MockBroker::on`] with one extra response header
    pub fn on_with_header(
        self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
        header: (&str, &str),
    ) -> Self {
        let header = Some((header.0.to_string(), header.1.to_string()));
        self.insert(method, path, status, body, header)
    }

    fn insert(
        self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
        header: Option<(String, String)>,
    ) -> Self {
        self.responses.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            CannedResponse {
                status,
                body: body.to_string(),
                header,
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn into_service(self) -> HttpService {
        BoxCloneSyncService::new(self)
    }

    /// Build a broker client that sends every request to this mock
    pub fn into_client(self, config: ClientConfiguration) -> Client {
        Client::with_service(config, self.into_service()).unwrap()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<CannedResponse> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

fn boxed_body(body: String) -> ResponseBody {
    Full::new(Bytes::from(body))
        .map_err(|never: Infallible| -> BoxError { match never {} })
        .boxed_unsync()
}

impl Service<Request<Full<Bytes>>> for MockBroker {
    type Response = Response<ResponseBody>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        let (parts, body) = req.into_parts();
        let canned = self.find_response(parts.method.as_str(), parts.uri.path());
        let requests = self.requests.clone();

        Box::pin(async move {
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };
            requests.lock().unwrap().push(RecordedRequest {
                method: parts.method,
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts.headers,
                body,
            });

            let canned = canned.unwrap_or(CannedResponse {
                status: 404,
                body: r#"{"description":"not found"}"#.to_string(),
                header: None,
            });
            let mut builder = Response::builder()
                .status(canned.status)
                .header("content-type", "application/json");
            if let Some((name, value)) = canned.header {
                builder = builder.header(name, value);
            }
            Ok::<_, BoxError>(builder.body(boxed_body(canned.body)).unwrap())
        })
    }
}

/// A mock Kubernetes API server answering GET requests by exact path
#[derive(Clone, Default)]
pub struct MockKubeApi {
    responses: Arc<Mutex<HashMap<String, (u16, String)>>>,
}

impl MockKubeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
        self
    }

    pub fn into_client(self) -> kube::Client {
        kube::Client::new(self, "default")
    }
}

impl Service<Request<kube::client::Body>> for MockKubeApi {
    type Response = Response<kube::client::Body>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<kube::client::Body>) -> Self::Future {
        let found = if *req.method() == Method::GET {
            self.responses.lock().unwrap().get(req.uri().path()).cloned()
        } else {
            None
        };
        let (status, body) = found.unwrap_or_else(|| (404, not_found_json(req.uri().path())));

        Box::pin(async move {
            Ok::<_, BoxError>(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(kube::client::Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// A v1 Secret with each value base64-encoded, as the API server returns it
pub fn secret_json(namespace: &str, name: &str, data: &[(&str, &str)]) -> String {
    let data: serde_json::Map<String, serde_json::Value> = data
        .iter()
        .map(|(k, v)| (k.to_string(), STANDARD.encode(v).into()))
        .collect();
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Secret",
        "metadata": {"name": name, "namespace": namespace},
        "data": data
    })
    .to_string()
}

pub fn not_found_json(path: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} not found", path),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Install a test subscriber so `warn!` output shows up with `--nocapture`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
