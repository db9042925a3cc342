// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Broker connection details stored in a Kubernetes Secret

use crate::config::{AuthConfig, ClientConfiguration};
use crate::error::{Error, Result};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

pub const URL_KEY: &str = "url";
pub const USERNAME_KEY: &str = "username";
pub const PASSWORD_KEY: &str = "password";
pub const TOKEN_KEY: &str = "token";

/// Build a [`ClientConfiguration`] from the Secret `namespace/secret_name`.
///
/// `url` is mandatory. `username` with `password` selects Basic auth,
/// otherwise `token` selects Bearer auth. The configuration is named after
/// the Secret.
#[instrument(skip(client))]
pub async fn load_configuration(
    client: &Client,
    namespace: &str,
    secret_name: &str,
) -> Result<ClientConfiguration> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    info!("Loading broker configuration from secret '{}/{}'", namespace, secret_name);
    let secret = secrets.get(secret_name).await?;

    let Some(data) = secret.data.as_ref() else {
        return Err(Error::Config(format!(
            "Secret {}/{} has no data",
            namespace, secret_name
        )));
    };

    let Some(url) = read_key(data, URL_KEY, secret_name)? else {
        return Err(Error::Config(format!(
            "Secret {}/{} does not contain '{}' key",
            namespace, secret_name, URL_KEY
        )));
    };

    let mut config = ClientConfiguration::new(url);
    config.name = format!("{}/{}", namespace, secret_name);

    let username = read_key(data, USERNAME_KEY, secret_name)?;
    let password = read_key(data, PASSWORD_KEY, secret_name)?;
    let token = read_key(data, TOKEN_KEY, secret_name)?;

    config.auth = match (username, password, token) {
        (Some(username), Some(password), _) => Some(AuthConfig::basic(username, password)),
        (_, _, Some(token)) => Some(AuthConfig::bearer(token)),
        _ => None,
    };

    debug!(
        "Secret {}/{} points at {} with {} auth",
        namespace,
        secret_name,
        config.url,
        match &config.auth {
            Some(AuthConfig::Basic { .. }) => "basic",
            Some(AuthConfig::Bearer { .. }) => "bearer",
            None => "no",
        }
    );

    Ok(config)
}

fn read_key(
    data: &BTreeMap<String, ByteString>,
    key: &str,
    secret_name: &str,
) -> Result<Option<String>> {
    let Some(value) = data.get(key) else {
        return Ok(None);
    };

    String::from_utf8(value.0.clone())
        .map(|s| Some(s.trim().to_string()))
        .map_err(|e| {
            Error::Config(format!(
                "Key '{}' of secret {} is not valid UTF-8: {}",
                key, secret_name, e
            ))
        })
}
