// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// How a [`super::FakeClient`] answers one kind of request
pub struct Reaction<Req, Resp> {
    handler: Arc<dyn Fn(&Req) -> Result<Resp> + Send + Sync>,
}

impl<Req, Resp> Reaction<Req, Resp> {
    /// Always answer with `response`
    pub fn respond(response: Resp) -> Self
    where
        Resp: Clone + Send + Sync + 'static,
    {
        Self::from_fn(move |_| Ok(response.clone()))
    }

    /// Always fail with `error`
    pub fn fail<E>(error: E) -> Self
    where
        E: Into<Error> + Clone + Send + Sync + 'static,
    {
        Self::from_fn(move |_| Err(error.clone().into()))
    }

    /// Compute the answer from the request
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Req) -> Result<Resp> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(f),
        }
    }

    pub(crate) fn react(&self, request: &Req) -> Result<Resp> {
        (self.handler)(request)
    }
}

impl<Req, Resp> Clone for Reaction<Req, Resp> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

impl<Req, Resp> fmt::Debug for Reaction<Req, Resp> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Reaction")
    }
}
