// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for operators that keep broker credentials in Secrets.

pub mod secret;

pub use secret::load_configuration;
