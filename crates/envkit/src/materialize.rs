// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Materialization of a concrete env file from a template.

use std::path::{Path, PathBuf};

use crate::secrets::{generate_hex, Confirm, SECRETS};
use crate::{keys, EnvFile, Error, Result, Tier, DEFAULT_CERT_DIR, DEFAULT_PORT};

#[cfg(test)]
#[path = "./materialize_test.rs"]
mod materialize_test;

/// Port the frontend dev server is expected on; used for the CORS origin.
const FRONTEND_PORT: u16 = 3000;

/// Filenames of the TLS material inside the certificate directory.
const CERT_FILENAME: &str = "cert.pem";
const KEY_FILENAME: &str = "key.pem";

const SECRETS_PROMPT: &str =
    "Generate random values for SECRET_KEY, FIRST_SUPERUSER_PASSWORD and POSTGRES_PASSWORD?";

/// Resolved options for one materialization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub tier: Tier,
    pub host: String,
    pub port: u16,
    pub ssl: bool,
    /// Certificate directory. Relative paths are taken from the target's
    /// directory and written to the env file as given.
    pub cert_dir: PathBuf,
}

impl SetupOptions {
    /// Options for `tier` with every other value defaulted.
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            ssl: false,
            cert_dir: PathBuf::from(DEFAULT_CERT_DIR),
        }
    }

    pub fn protocol(&self) -> &'static str {
        if self.ssl { "https" } else { "http" }
    }

    /// Allowed CORS origin, quoted as it is persisted.
    pub fn cors_origin(&self) -> String {
        format!("\"{}://{}:{FRONTEND_PORT}\"", self.protocol(), self.host)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::invalid_port(keys::SERVER_PORT, "0"));
        }
        if self.host.is_empty() || self.host.chars().any(char::is_whitespace) {
            return Err(Error::InvalidValue {
                key: keys::SERVER_HOST.to_string(),
                reason: format!("{:?} is not a valid host name", self.host),
            });
        }
        Ok(())
    }
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self::new(Tier::default())
    }
}

/// Summary of a materialization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Keys written by this run, in the order they were applied.
    pub updated: Vec<String>,
    /// Whether secrets were generated.
    pub secrets_generated: bool,
    /// Certificate directory ensured for SSL, if requested.
    pub cert_dir: Option<PathBuf>,
}

/// Materialize `target` from `template` for the given options.
///
/// The template is copied over the target and the derived keys are upserted.
/// `confirm` is asked once whether to generate fresh secrets; declining
/// leaves the template's values in place. Options are validated and the
/// template read before anything is written.
pub fn materialize<C>(
    template: &Path,
    target: &Path,
    options: &SetupOptions,
    confirm: &mut C,
) -> Result<MaterializeReport>
where
    C: Confirm + ?Sized,
{
    options.validate()?;

    let text = std::fs::read_to_string(template).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::TemplateNotFound(template.to_path_buf())
        } else {
            Error::ReadFailed {
                path: template.to_path_buf(),
                error: e,
            }
        }
    })?;

    let mut file = EnvFile::parse(text);
    let mut report = MaterializeReport::default();
    let mut set = |file: &mut EnvFile, key: &str, value: &str| -> Result<()> {
        tracing::debug!(key, "upsert");
        file.set_var(key, value)?;
        report.updated.push(key.to_string());
        Ok(())
    };

    set(&mut file, keys::ENVIRONMENT, options.tier.as_str())?;
    set(&mut file, keys::SERVER_PROTOCOL, options.protocol())?;
    set(&mut file, keys::SERVER_HOST, &options.host)?;
    set(&mut file, keys::SERVER_PORT, &options.port.to_string())?;
    set(&mut file, keys::CORS_ORIGINS, &options.cors_origin())?;

    if options.ssl {
        let cert_dir = resolve_cert_dir(target, &options.cert_dir);
        std::fs::create_dir_all(&cert_dir).map_err(|e| Error::WriteFailed {
            path: cert_dir.clone(),
            error: e,
        })?;

        let cert = options.cert_dir.join(CERT_FILENAME);
        let key = options.cert_dir.join(KEY_FILENAME);
        set(&mut file, keys::SSL_CERT_FILE, &cert.display().to_string())?;
        set(&mut file, keys::SSL_KEY_FILE, &key.display().to_string())?;

        if !cert_dir.join(CERT_FILENAME).is_file() || !cert_dir.join(KEY_FILENAME).is_file() {
            tracing::warn!(
                dir = %cert_dir.display(),
                "SSL enabled but {CERT_FILENAME}/{KEY_FILENAME} are not present yet"
            );
        }
        report.cert_dir = Some(cert_dir);
    }

    file.save(target)?;
    tracing::info!(
        path = %target.display(),
        tier = %options.tier,
        "materialized env file"
    );

    if confirm.confirm(SECRETS_PROMPT) {
        for secret in SECRETS {
            file.set_var(secret.key, &generate_hex(secret.bytes))?;
            tracing::debug!(key = secret.key, "generated secret");
            report.updated.push(secret.key.to_string());
        }
        file.save(target)?;
        report.secrets_generated = true;
        tracing::info!("generated {} secrets", SECRETS.len());
    } else {
        tracing::info!("keeping existing secret values");
    }

    Ok(report)
}

fn resolve_cert_dir(target: &Path, cert_dir: &Path) -> PathBuf {
    if cert_dir.is_absolute() {
        return cert_dir.to_path_buf();
    }
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(cert_dir),
        _ => cert_dir.to_path_buf(),
    }
}
