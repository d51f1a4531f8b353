// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Validation of persisted settings before the service starts.

use std::fmt;

use serde::Serialize;

use crate::launch::{parse_port, resolve_tier, resolve_tls};
use crate::secrets::SECRETS;
use crate::settings::{parse_cors, parse_protocol};
use crate::{keys, EnvSnapshot, Tier, DEFAULT_PORT, PLACEHOLDER_SECRET};

#[cfg(test)]
#[path = "./check_test.rs"]
mod check_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single problem found in the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub key: String,
    pub message: String,
}

impl Finding {
    fn new(severity: Severity, key: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Check `snapshot` for configuration problems.
///
/// Every rule runs, so one bad value does not hide another. Placeholder
/// secrets are tolerated with a warning only in development tiers.
pub fn check(snapshot: &EnvSnapshot) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut error = |key: &str, err: crate::Error| {
        findings.push(Finding::new(Severity::Error, key, err.to_string()));
    };

    // An unknown tier is checked as strictly as production.
    let tier = match resolve_tier(snapshot) {
        Ok(tier) => tier,
        Err(err) => {
            error(keys::ENVIRONMENT, err);
            Tier::Production
        }
    };

    if let Err(err) = parse_port(snapshot, keys::SERVER_PORT, DEFAULT_PORT) {
        error(keys::SERVER_PORT, err);
    }
    if let Err(err) = parse_cors(snapshot.get(keys::CORS_ORIGINS).unwrap_or_default()) {
        error(keys::CORS_ORIGINS, err);
    }

    let tls = resolve_tls(snapshot);
    if let Err(err) = &tls {
        let key = match err {
            crate::Error::TlsPairMismatch { missing, .. } => missing.clone(),
            _ => keys::SSL_CERT_FILE.to_string(),
        };
        findings.push(Finding::new(Severity::Error, &key, err.to_string()));
    }

    match parse_protocol(snapshot.get_non_empty(keys::SERVER_PROTOCOL)) {
        Err(err) => findings.push(Finding::new(
            Severity::Error,
            keys::SERVER_PROTOCOL,
            err.to_string(),
        )),
        Ok(protocol) => match (protocol, &tls) {
            ("https", Ok(None)) => findings.push(Finding::new(
                Severity::Warning,
                keys::SERVER_PROTOCOL,
                "protocol is https but no SSL_CERT_FILE/SSL_KEY_FILE are configured",
            )),
            ("http", Ok(Some(_))) => findings.push(Finding::new(
                Severity::Warning,
                keys::SERVER_PROTOCOL,
                "TLS files are configured but protocol is http",
            )),
            _ => {}
        },
    }

    for secret in SECRETS {
        match snapshot.get_non_empty(secret.key) {
            None => findings.push(Finding::new(Severity::Warning, secret.key, "not set")),
            Some(PLACEHOLDER_SECRET) => {
                let severity = if tier.is_development() {
                    Severity::Warning
                } else {
                    Severity::Error
                };
                findings.push(Finding::new(
                    severity,
                    secret.key,
                    format!(
                        "still {PLACEHOLDER_SECRET:?}; change it for dev, staging and production deployments"
                    ),
                ));
            }
            Some(_) => {}
        }
    }

    findings.sort_by(|a, b| b.severity.cmp(&a.severity));
    findings
}
