// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Typed view of the service settings persisted in an env file.

use serde::Serialize;

use crate::launch::{parse_port, resolve_tier, resolve_tls};
use crate::{keys, EnvSnapshot, Error, Result, Tier, DEFAULT_PORT};

#[cfg(test)]
#[path = "./settings_test.rs"]
mod settings_test;

/// Server settings as the running service will see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub environment: Tier,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub cors_origins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_key_file: Option<String>,
}

impl Settings {
    pub fn from_snapshot(snapshot: &EnvSnapshot) -> Result<Self> {
        let environment = resolve_tier(snapshot)?;
        let protocol = parse_protocol(snapshot.get_non_empty(keys::SERVER_PROTOCOL))?;
        let host = snapshot
            .get_non_empty(keys::SERVER_HOST)
            .unwrap_or("localhost")
            .to_string();
        let port = parse_port(snapshot, keys::SERVER_PORT, DEFAULT_PORT)?;
        let cors_origins = parse_cors(snapshot.get(keys::CORS_ORIGINS).unwrap_or_default())?;
        let tls = resolve_tls(snapshot)?;

        Ok(Self {
            environment,
            base_url: format!("{protocol}://{host}:{port}"),
            protocol: protocol.to_string(),
            host,
            port,
            cors_origins,
            ssl_cert_file: tls.as_ref().map(|t| t.cert.clone()),
            ssl_key_file: tls.map(|t| t.key),
        })
    }
}

/// `SERVER_PROTOCOL`, `http` when unset.
pub(crate) fn parse_protocol(value: Option<&str>) -> Result<&'static str> {
    match value {
        None | Some("http") => Ok("http"),
        Some("https") => Ok("https"),
        Some(other) => Err(Error::InvalidValue {
            key: keys::SERVER_PROTOCOL.to_string(),
            reason: format!("expected http or https, got {other:?}"),
        }),
    }
}

/// Parse allowed CORS origins.
///
/// Accepts a comma-separated list or a JSON array of strings. Entries are
/// trimmed, trailing slashes removed and empty entries dropped.
pub fn parse_cors(value: &str) -> Result<Vec<String>> {
    let value = value.trim();
    let invalid = |reason: String| Error::InvalidValue {
        key: keys::CORS_ORIGINS.to_string(),
        reason,
    };

    let entries: Vec<String> = if value.starts_with('[') {
        serde_json::from_str(value).map_err(|e| invalid(format!("invalid JSON list: {e}")))?
    } else {
        value.split(',').map(String::from).collect()
    };

    let mut origins = Vec::new();
    for entry in entries {
        let origin = entry.trim().trim_end_matches('/');
        if origin.is_empty() {
            continue;
        }
        match origin.split_once("://") {
            Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => {
                origins.push(origin.to_string());
            }
            _ => return Err(invalid(format!("{origin:?} is not a URL"))),
        }
    }
    Ok(origins)
}
