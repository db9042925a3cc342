// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Asynchronous operation tracking.
//!
//! The broker drives every state change; this module only classifies the
//! state string it reports.

use crate::error::OperationStateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque token a broker hands out when it accepts a request asynchronously.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OperationKey(pub String);

impl OperationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for OperationKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OperationKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of an asynchronous operation as reported by `last_operation`.
///
/// The OSB wire values "in progress", "succeeded" and "failed" have their
/// own variants so the broker's label survives a round trip; they classify
/// like `Processing`, `Done` and `Error`. Anything unrecognised is kept
/// verbatim and treated as still in progress.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum OperationState {
    Queued,
    Processing,
    Pending,
    Done,
    Error,
    Cancelled,
    Timeout,
    InProgress,
    Succeeded,
    Failed,
    Unknown(String),
}

impl OperationState {
    pub fn as_str(&self) -> &str {
        match self {
            OperationState::Queued => "queued",
            OperationState::Processing => "processing",
            OperationState::Pending => "pending",
            OperationState::Done => "done",
            OperationState::Error => "error",
            OperationState::Cancelled => "cancelled",
            OperationState::Timeout => "timeout",
            OperationState::InProgress => "in progress",
            OperationState::Succeeded => "succeeded",
            OperationState::Failed => "failed",
            OperationState::Unknown(s) => s,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, OperationState::Done | OperationState::Succeeded)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            OperationState::Error
                | OperationState::Failed
                | OperationState::Cancelled
                | OperationState::Timeout
        )
    }

    pub fn is_in_progress(&self) -> bool {
        !self.is_done() && !self.is_failure()
    }
}

impl From<String> for OperationState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => OperationState::Queued,
            "processing" => OperationState::Processing,
            "pending" => OperationState::Pending,
            "done" => OperationState::Done,
            "error" => OperationState::Error,
            "cancelled" => OperationState::Cancelled,
            "timeout" => OperationState::Timeout,
            "in progress" => OperationState::InProgress,
            "succeeded" => OperationState::Succeeded,
            "failed" => OperationState::Failed,
            _ => OperationState::Unknown(value),
        }
    }
}

impl From<&str> for OperationState {
    fn from(value: &str) -> Self {
        OperationState::from(value.to_string())
    }
}

impl From<OperationState> for String {
    fn from(state: OperationState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Poll the `last_operation` endpoint of an instance, or of a binding when
/// `binding_id` is set (binding polling requires API version 2.14).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetOperationRequest {
    pub instance_id: String,
    pub binding_id: Option<String>,
    pub service_id: Option<String>,
    pub plan_id: Option<String>,
    pub operation_key: Option<OperationKey>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GetOperationResponse {
    pub state: OperationState,
    pub description: Option<String>,
    /// From the broker's `Retry-After` header
    pub poll_delay: Option<Duration>,
}

impl GetOperationResponse {
    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    pub fn is_failure(&self) -> bool {
        self.state.is_failure()
    }

    /// The terminal failure, if the operation reached one. Once this returns
    /// `Some` the broker reports no further changes; stop polling.
    pub fn failure(&self) -> Option<OperationStateError> {
        self.is_failure().then(|| OperationStateError {
            state: self.state.to_string(),
        })
    }
}

#[derive(Deserialize)]
pub(crate) struct LastOperationBody {
    pub state: OperationState,
    #[serde(default)]
    pub description: Option<String>,
}
