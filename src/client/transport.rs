// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Request plumbing shared by every broker operation.
//!
//! The HTTP stack is a boxed `tower` service so tests can swap in a mock the
//! same way a kube `Client` is built on top of any service.

use super::Client;
use crate::constants::headers;
use crate::error::{BoxError, Error, HttpStatusCodeError, Result};
use crate::types::OriginatingIdentity;
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, Response};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tower::timeout::Timeout;
use tower::util::BoxCloneSyncService;
use tower::ServiceExt;
use tracing::debug;
use url::Url;

pub type ResponseBody = UnsyncBoxBody<Bytes, BoxError>;

/// The HTTP stack a [`Client`] sends requests through
pub type HttpService = BoxCloneSyncService<Request<Full<Bytes>>, Response<ResponseBody>, BoxError>;

/// A broker response whose body has already been read to the end, so the
/// underlying connection is free for reuse whatever the caller does next.
pub type BrokerResponse = Response<Bytes>;

/// HTTP/1.1 over TLS or plain TCP, with optional per-request timeout
pub fn https_service(timeout: Option<Duration>) -> HttpService {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();

    let client = HyperClient::builder(TokioExecutor::new())
        .build::<_, Full<Bytes>>(connector)
        .map_response(|response: Response<Incoming>| {
            response.map(|body| body.map_err(|e| Box::new(e) as BoxError).boxed_unsync())
        })
        .map_err(|e: hyper_util::client::legacy::Error| Box::new(e) as BoxError);

    match timeout {
        Some(timeout) => BoxCloneSyncService::new(Timeout::new(client, timeout)),
        None => BoxCloneSyncService::new(client),
    }
}

impl Client {
    /// Send one request and read the whole response.
    ///
    /// Adds the API version, auth and originating identity headers and
    /// encodes `body` as JSON. Failures to reach the broker come back as
    /// [`Error::Transport`]; any status code, including errors, is returned
    /// as a response for the caller to interpret.
    pub(crate) async fn prepare_and_do(
        &self,
        method: Method,
        mut url: Url,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
        identity: Option<&OriginatingIdentity>,
    ) -> Result<BrokerResponse> {
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(url.as_str())
            .header(headers::API_VERSION, self.api_version.header_value())
            .header(ACCEPT, "application/json");

        if let Some(auth) = &self.auth {
            builder = builder.header(AUTHORIZATION, auth.header_value());
        }
        if let Some(identity) = identity {
            builder = builder.header(headers::ORIGINATING_IDENTITY, identity.header_value());
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Bytes::from(bytes)
            }
            None => Bytes::new(),
        };

        let request = builder
            .body(Full::new(body))
            .map_err(|e| Error::InvalidRequest(e.to_string()))?;

        debug!(broker = %self.name, %method, %url, "Sending broker request");

        let response = self
            .service
            .clone()
            .oneshot(request)
            .await
            .map_err(Error::Transport)?;

        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.map_err(Error::Transport)?.to_bytes();

        debug!(broker = %self.name, %method, %url, status = %parts.status, "Received broker response");

        Ok(Response::from_parts(parts, bytes))
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        identity: Option<&OriginatingIdentity>,
    ) -> Result<BrokerResponse> {
        self.prepare_and_do(method, url, query, None, identity).await
    }

    pub(crate) async fn send_json<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: &B,
        identity: Option<&OriginatingIdentity>,
    ) -> Result<BrokerResponse> {
        let body = serde_json::to_vec(body)?;
        self.prepare_and_do(method, url, query, Some(body), identity)
            .await
    }
}

/// Decode a success body. An empty body decodes as `T::default()`, some
/// brokers answer 200/201/202 without one.
pub(crate) fn decode<T: DeserializeOwned + Default>(response: &BrokerResponse) -> Result<T> {
    if response.body().iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    decode_required(response)
}

/// Decode a success body that must be present. A body that does not parse
/// is reported as an [`HttpStatusCodeError`] carrying the status and the
/// decode error.
pub(crate) fn decode_required<T: DeserializeOwned>(response: &BrokerResponse) -> Result<T> {
    serde_json::from_slice(response.body()).map_err(|e| {
        HttpStatusCodeError::decode_failure(response.status().as_u16(), e).into()
    })
}

/// Turn a non-success response into an [`HttpStatusCodeError`]
pub(crate) fn handle_failure_response(response: &BrokerResponse) -> Error {
    let err = HttpStatusCodeError::from_response(response.status().as_u16(), response.body());
    debug!(status = err.status_code, error = ?err.error_message, "Broker returned failure response");
    err.into()
}

pub(crate) fn accepts_incomplete_query(accepts_incomplete: bool) -> Vec<(&'static str, String)> {
    if accepts_incomplete {
        vec![(crate::constants::query::ACCEPTS_INCOMPLETE, "true".to_string())]
    } else {
        Vec::new()
    }
}
