// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for broker calls.
//!
//! Network failures surface as [`Error::Transport`] and are never classified.
//! Non-success broker responses become an [`HttpStatusCodeError`], which the
//! `is_*_error` predicates below inspect. The predicates walk `source()`
//! chains, so they keep working after a caller wraps the error (for example
//! with `anyhow::Context`).

use crate::constants::broker_errors;
use crate::version::APIVersion;
use serde::Deserialize;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    /// Connection, TLS or timeout failure; the broker was never heard from
    #[error(transparent)]
    Transport(BoxError),

    #[error(transparent)]
    HttpStatusCode(#[from] HttpStatusCodeError),

    #[error(transparent)]
    OperationNotAllowed(#[from] OperationNotAllowedError),

    #[error(transparent)]
    OperationState(#[from] OperationStateError),

    #[error(transparent)]
    AvailabilityInvalidStatus(#[from] AvailabilityInvalidStatusError),

    #[error("Failed to encode request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid broker URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for failures below the protocol layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// The structured error behind a transparent variant, if any
    fn structured(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::HttpStatusCode(e) => Some(e),
            Error::OperationNotAllowed(e) => Some(e),
            Error::OperationState(e) => Some(e),
            Error::AvailabilityInvalidStatus(e) => Some(e),
            _ => None,
        }
    }
}

/// A broker answered with a status code the operation does not treat as success.
///
/// At most one of the parsed body fields (`error_message`, `description`) and
/// `response_error` is populated: either the body decoded as the conventional
/// `{"error": ..., "description": ...}` object, or decoding failed and the
/// decode error is kept instead.
#[derive(Debug, Clone, Default)]
pub struct HttpStatusCodeError {
    pub status_code: u16,
    pub error_message: Option<String>,
    pub description: Option<String>,
    pub response_error: Option<Arc<serde_json::Error>>,
}

#[derive(Deserialize)]
struct FailureResponseBody {
    error: Option<String>,
    description: Option<String>,
}

impl HttpStatusCodeError {
    /// Classify a failure response from its status and raw body
    pub fn from_response(status_code: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<FailureResponseBody>(body) {
            Ok(parsed) => Self {
                status_code,
                error_message: parsed.error,
                description: parsed.description,
                response_error: None,
            },
            Err(e) => Self::decode_failure(status_code, e),
        }
    }

    /// A response whose body did not parse, whatever its status
    pub fn decode_failure(status_code: u16, err: serde_json::Error) -> Self {
        Self {
            status_code,
            response_error: Some(Arc::new(err)),
            ..Default::default()
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status_code == http::StatusCode::CONFLICT.as_u16()
    }

    pub fn is_gone(&self) -> bool {
        self.status_code == http::StatusCode::GONE.as_u16()
    }

    pub fn is_async_required(&self) -> bool {
        self.is_unprocessable_with(
            broker_errors::ASYNC_REQUIRED_MESSAGE,
            broker_errors::ASYNC_REQUIRED_DESCRIPTION,
        )
    }

    pub fn is_app_guid_required(&self) -> bool {
        self.is_unprocessable_with(
            broker_errors::APP_GUID_REQUIRED_MESSAGE,
            broker_errors::APP_GUID_REQUIRED_DESCRIPTION,
        )
    }

    pub fn is_concurrency(&self) -> bool {
        self.is_unprocessable_with(
            broker_errors::CONCURRENCY_MESSAGE,
            broker_errors::CONCURRENCY_DESCRIPTION,
        )
    }

    // 422 is shared by several business-rule failures, the body tells them apart
    fn is_unprocessable_with(&self, message: &str, description: &str) -> bool {
        self.status_code == http::StatusCode::UNPROCESSABLE_ENTITY.as_u16()
            && self.error_message.as_deref() == Some(message)
            && self.description.as_deref() == Some(description)
    }
}

struct NilOr<'a, T: ?Sized>(Option<&'a T>);

impl<T: fmt::Display + ?Sized> fmt::Display for NilOr<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("<nil>"),
        }
    }
}

impl fmt::Display for HttpStatusCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status: {}; ErrorMessage: {}; Description: {}; ResponseError: {}",
            self.status_code,
            NilOr(self.error_message.as_deref()),
            NilOr(self.description.as_deref()),
            NilOr(self.response_error.as_deref()),
        )
    }
}

impl StdError for HttpStatusCodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.response_error
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// The client refused to send a request the negotiated API version or the
/// disabled alpha features cannot express.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("operation not allowed: {reason}")]
pub struct OperationNotAllowedError {
    pub reason: String,
}

impl OperationNotAllowedError {
    pub fn version_too_low(required: APIVersion, current: APIVersion) -> Self {
        Self {
            reason: format!(
                "must have API version >= {}. Current: {}",
                required, current
            ),
        }
    }

    pub fn alpha_features_disabled(feature: &str) -> Self {
        Self {
            reason: format!("{} requires alpha features to be enabled", feature),
        }
    }
}

/// An asynchronous operation ended in one of the failure states.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("operation ended in state {state}")]
pub struct OperationStateError {
    pub state: String,
}

/// The availability probe got something other than 200 OK.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Received unexpected status {status_code}")]
pub struct AvailabilityInvalidStatusError {
    pub status_code: u16,
}

/// Find an error of type `T` in `err` or anywhere in its source chain.
pub fn error_as<'a, T: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a T> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<T>() {
            return Some(found);
        }
        if let Some(found) = e
            .downcast_ref::<Error>()
            .and_then(Error::structured)
            .and_then(|inner| inner.downcast_ref::<T>())
        {
            return Some(found);
        }
        current = e.source();
    }
    None
}

pub fn is_http_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a HttpStatusCodeError> {
    error_as::<HttpStatusCodeError>(err)
}

/// HTTP 409 from the broker
pub fn is_conflict_error(err: &(dyn StdError + 'static)) -> bool {
    is_http_error(err).is_some_and(HttpStatusCodeError::is_conflict)
}

/// HTTP 410 from the broker
pub fn is_gone_error(err: &(dyn StdError + 'static)) -> bool {
    is_http_error(err).is_some_and(HttpStatusCodeError::is_gone)
}

/// The broker needs `accepts_incomplete=true` to perform the operation
pub fn is_async_required_error(err: &(dyn StdError + 'static)) -> bool {
    is_http_error(err).is_some_and(HttpStatusCodeError::is_async_required)
}

/// The broker only binds when an application GUID is supplied
pub fn is_app_guid_required_error(err: &(dyn StdError + 'static)) -> bool {
    is_http_error(err).is_some_and(HttpStatusCodeError::is_app_guid_required)
}

/// Another operation on the same instance is in flight.
///
/// Distinct from [`is_conflict_error`]: some brokers report the same
/// situation as a 422 business-rule failure rather than a 409.
pub fn is_concurrency_error(err: &(dyn StdError + 'static)) -> bool {
    is_http_error(err).is_some_and(HttpStatusCodeError::is_concurrency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn status_error(status: u16, message: &str, description: &str) -> Error {
        Error::HttpStatusCode(HttpStatusCodeError {
            status_code: status,
            error_message: Some(message.to_string()),
            description: Some(description.to_string()),
            response_error: None,
        })
    }

    fn async_required() -> Error {
        status_error(
            422,
            broker_errors::ASYNC_REQUIRED_MESSAGE,
            broker_errors::ASYNC_REQUIRED_DESCRIPTION,
        )
    }

    fn app_guid_required() -> Error {
        status_error(
            422,
            broker_errors::APP_GUID_REQUIRED_MESSAGE,
            broker_errors::APP_GUID_REQUIRED_DESCRIPTION,
        )
    }

    fn concurrency() -> Error {
        status_error(
            422,
            broker_errors::CONCURRENCY_MESSAGE,
            broker_errors::CONCURRENCY_DESCRIPTION,
        )
    }

    #[test]
    fn test_blank_error_formatting() {
        let err = HttpStatusCodeError::default();
        assert_eq!(
            err.to_string(),
            "Status: 0; ErrorMessage: <nil>; Description: <nil>; ResponseError: <nil>"
        );
    }

    #[test]
    fn test_populated_error_formatting() {
        let err = HttpStatusCodeError {
            status_code: 422,
            error_message: Some("AsyncRequired".to_string()),
            description: Some("needs async".to_string()),
            response_error: None,
        };
        assert_eq!(
            err.to_string(),
            "Status: 422; ErrorMessage: AsyncRequired; Description: needs async; ResponseError: <nil>"
        );
    }

    #[test]
    fn test_empty_strings_are_not_nil() {
        let err = HttpStatusCodeError {
            status_code: 400,
            error_message: Some(String::new()),
            description: None,
            response_error: None,
        };
        assert_eq!(
            err.to_string(),
            "Status: 400; ErrorMessage: ; Description: <nil>; ResponseError: <nil>"
        );
    }

    #[test]
    fn test_from_response_parses_broker_body() {
        let err = HttpStatusCodeError::from_response(
            409,
            br#"{"error":"Conflict","description":"already exists"}"#,
        );
        assert_eq!(err.status_code, 409);
        assert_eq!(err.error_message.as_deref(), Some("Conflict"));
        assert_eq!(err.description.as_deref(), Some("already exists"));
        assert!(err.response_error.is_none());
    }

    #[test]
    fn test_from_response_keeps_decode_error() {
        let err = HttpStatusCodeError::from_response(500, b"<html>oops</html>");
        assert_eq!(err.status_code, 500);
        assert!(err.error_message.is_none());
        assert!(err.description.is_none());
        assert!(err.response_error.is_some());
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Status: 500; ErrorMessage: <nil>"));
        assert!(!err.to_string().ends_with("ResponseError: <nil>"));
    }

    #[test]
    fn test_from_response_empty_body_is_decode_error() {
        let err = HttpStatusCodeError::from_response(502, b"");
        assert!(err.response_error.is_some());
    }

    #[test]
    fn test_well_known_422_predicates_are_mutually_exclusive() {
        let cases = [
            (async_required(), [true, false, false]),
            (app_guid_required(), [false, true, false]),
            (concurrency(), [false, false, true]),
        ];

        for (err, expected) in cases {
            let got = [
                is_async_required_error(&err),
                is_app_guid_required_error(&err),
                is_concurrency_error(&err),
            ];
            assert_eq!(got, expected, "for {}", err);
        }
    }

    #[test]
    fn test_async_required_needs_matching_description() {
        let err = status_error(422, broker_errors::ASYNC_REQUIRED_MESSAGE, "something else");
        assert!(!is_async_required_error(&err));
    }

    #[test]
    fn test_async_required_needs_422() {
        let err = status_error(
            400,
            broker_errors::ASYNC_REQUIRED_MESSAGE,
            broker_errors::ASYNC_REQUIRED_DESCRIPTION,
        );
        assert!(!is_async_required_error(&err));
    }

    #[test]
    fn test_conflict_and_concurrency_are_distinct() {
        let conflict = Error::HttpStatusCode(HttpStatusCodeError {
            status_code: 409,
            ..Default::default()
        });
        assert!(is_conflict_error(&conflict));
        assert!(!is_concurrency_error(&conflict));
        assert!(!is_conflict_error(&concurrency()));
    }

    #[test]
    fn test_gone_error() {
        let gone = Error::HttpStatusCode(HttpStatusCodeError {
            status_code: 410,
            ..Default::default()
        });
        assert!(is_gone_error(&gone));
        assert!(!is_conflict_error(&gone));
    }

    #[test]
    fn test_predicates_on_bare_value() {
        let err = HttpStatusCodeError {
            status_code: 410,
            ..Default::default()
        };
        assert!(is_gone_error(&err));

        let boxed: Box<HttpStatusCodeError> = Box::new(err);
        assert!(is_gone_error(&*boxed));
    }

    #[test]
    fn test_predicates_through_anyhow_context() {
        let wrapped = anyhow::Error::from(async_required()).context("provisioning my-instance");
        assert!(is_async_required_error(wrapped.as_ref()));
        assert!(!is_gone_error(wrapped.as_ref()));
    }

    #[test]
    fn test_predicates_through_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("reconcile failed")]
        struct ReconcileError(#[source] Error);

        let wrapped = ReconcileError(app_guid_required());
        assert!(is_app_guid_required_error(&wrapped));
    }

    #[test]
    fn test_predicates_ignore_other_errors() {
        let err = Error::InvalidRequest("no".to_string());
        assert!(is_http_error(&err).is_none());
        assert!(!is_conflict_error(&err));
        assert!(!is_async_required_error(&err));
    }

    #[test]
    fn test_error_as_finds_operation_state_error() {
        let err = Error::OperationState(OperationStateError {
            state: "timeout".to_string(),
        });
        let found = error_as::<OperationStateError>(&err).unwrap();
        assert_eq!(found.state, "timeout");
    }

    #[test]
    fn test_operation_not_allowed_message() {
        let err = OperationNotAllowedError::version_too_low(APIVersion::v2_14(), APIVersion::v2_12());
        assert_eq!(
            err.to_string(),
            "operation not allowed: must have API version >= 2.14. Current: 2.12"
        );
    }

    #[test]
    fn test_availability_error_message() {
        let err = AvailabilityInvalidStatusError { status_code: 401 };
        assert_eq!(err.to_string(), "Received unexpected status 401");
    }

    #[test]
    fn test_transport_is_not_classified() {
        let err = Error::Transport("connection refused".into());
        assert!(err.is_transport());
        assert!(is_http_error(&err).is_none());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_context_message_is_kept() {
        let result: std::result::Result<(), Error> = Err(concurrency());
        let err = result.context("updating instance").unwrap_err();
        assert_eq!(err.to_string(), "updating instance");
        assert!(is_concurrency_error(err.as_ref()));
    }
}
