// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Synthesis of the server launch command.
//!
//! The command is always assembled in the same order: interpreter and server
//! module, bind address, hot-reload flags (development tiers only), TLS
//! flags. When the debugger is enabled it wraps the whole server invocation
//! instead of adding flags to it.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::{
    keys, EnvSnapshot, Error, Result, Tier, CONTAINER_MARKER, DEFAULT_DEBUG_PORT, DEFAULT_PORT,
};

#[cfg(test)]
#[path = "./launch_test.rs"]
mod launch_test;

const DEFAULT_PYTHON: &str = "python";
const DEFAULT_APP: &str = "src.main:app";
const DEFAULT_SOURCE_DIR: &str = "src";
const DEFAULT_LOCAL_HOST: &str = "127.0.0.1";
const WILDCARD_HOST: &str = "0.0.0.0";

/// Knobs that do not come from the environment snapshot.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Bind host override; wins over container detection and `SERVER_HOST`.
    pub host: Option<String>,
    /// File whose existence marks a container.
    pub container_marker: PathBuf,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            host: None,
            container_marker: PathBuf::from(CONTAINER_MARKER),
        }
    }
}

/// A program and its argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl LaunchSpec {
    /// Replace the current process with this command.
    ///
    /// Only returns if the exec itself failed.
    #[cfg(unix)]
    pub fn exec(self) -> Error {
        use std::os::unix::process::CommandExt;

        tracing::info!(program = %self.program, "exec");
        let error = std::process::Command::new(&self.program)
            .args(&self.args)
            .exec();
        Error::ExecFailed {
            program: self.program,
            error,
        }
    }

    /// Run this command to completion and exit with its status.
    ///
    /// Only returns if the command could not be started.
    #[cfg(not(unix))]
    pub fn exec(self) -> Error {
        tracing::info!(program = %self.program, "spawn");
        match std::process::Command::new(&self.program)
            .args(&self.args)
            .status()
        {
            Ok(status) => std::process::exit(status.code().unwrap_or(1)),
            Err(error) => Error::ExecFailed {
                program: self.program,
                error,
            },
        }
    }
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_arg(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", display_arg(arg))?;
        }
        Ok(())
    }
}

/// Quote an argument for human display only; never fed to a shell.
fn display_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || "'\"$\\".contains(c)) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// TLS certificate and key paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsFiles {
    pub cert: String,
    pub key: String,
}

/// Everything the launch decision depends on, validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchConfig {
    pub tier: Tier,
    pub host: String,
    pub port: u16,
    pub in_container: bool,
    /// Debugger port when debugging is enabled.
    pub debug_port: Option<u16>,
    pub tls: Option<TlsFiles>,
    pub python: String,
    pub app: String,
    pub source_dir: String,
}

impl LaunchConfig {
    /// Resolve and validate launch inputs from a snapshot.
    pub fn resolve(snapshot: &EnvSnapshot, options: &LaunchOptions) -> Result<Self> {
        let tier = resolve_tier(snapshot)?;
        let port = parse_port(snapshot, keys::SERVER_PORT, DEFAULT_PORT)?;
        let debug_port = if snapshot.flag(keys::DEBUG) {
            Some(parse_port(snapshot, keys::DEBUG_PORT, DEFAULT_DEBUG_PORT)?)
        } else {
            None
        };

        let tls = resolve_tls(snapshot)?;

        let in_container = options.container_marker.exists();
        let host = match &options.host {
            Some(host) => host.clone(),
            None if in_container => WILDCARD_HOST.to_string(),
            None => snapshot
                .get_non_empty(keys::SERVER_HOST)
                .unwrap_or(DEFAULT_LOCAL_HOST)
                .to_string(),
        };

        let or_default = |key: &str, default: &str| {
            snapshot.get_non_empty(key).unwrap_or(default).to_string()
        };

        Ok(Self {
            tier,
            host,
            port,
            in_container,
            debug_port,
            tls,
            python: or_default(keys::PYTHON, DEFAULT_PYTHON),
            app: or_default(keys::SERVER_APP, DEFAULT_APP),
            source_dir: or_default(keys::SOURCE_DIR, DEFAULT_SOURCE_DIR),
        })
    }

    /// Assemble the launch command.
    pub fn command(&self) -> LaunchSpec {
        let mut args = Vec::new();

        if let Some(debug_port) = self.debug_port {
            args.extend([
                "-m".to_string(),
                "debugpy".to_string(),
                "--listen".to_string(),
                format!("{WILDCARD_HOST}:{debug_port}"),
                "--wait-for-client".to_string(),
            ]);
        }

        args.extend([
            "-m".to_string(),
            "uvicorn".to_string(),
            self.app.clone(),
            "--host".to_string(),
            self.host.clone(),
            "--port".to_string(),
            self.port.to_string(),
        ]);

        if self.tier.reloads() {
            args.extend([
                "--reload".to_string(),
                "--reload-dir".to_string(),
                self.source_dir.clone(),
            ]);
        }

        if let Some(tls) = &self.tls {
            args.extend([
                "--ssl-certfile".to_string(),
                tls.cert.clone(),
                "--ssl-keyfile".to_string(),
                tls.key.clone(),
            ]);
        }

        LaunchSpec {
            program: self.python.clone(),
            args,
        }
    }

    /// Human-readable status shown before the process is replaced.
    pub fn banner(&self, spec: &LaunchSpec) -> String {
        let host = if self.in_container {
            format!("{} (container)", self.host)
        } else {
            self.host.clone()
        };
        let debugger = match self.debug_port {
            Some(port) => format!("waiting for client on {WILDCARD_HOST}:{port}"),
            None => "disabled".to_string(),
        };
        let tls = if self.tls.is_some() { "enabled" } else { "disabled" };

        format!(
            "Starting server\n  \
            environment: {}\n  \
            host:        {host}\n  \
            port:        {}\n  \
            tls:         {tls}\n  \
            debugger:    {debugger}\n  \
            command:     {spec}\n",
            self.tier, self.port,
        )
    }
}

/// Build the launch command for `snapshot`.
pub fn build_command(snapshot: &EnvSnapshot, options: &LaunchOptions) -> Result<LaunchSpec> {
    Ok(LaunchConfig::resolve(snapshot, options)?.command())
}

/// Parse a port value, falling back to `default` when unset.
pub(crate) fn parse_port(snapshot: &EnvSnapshot, key: &str, default: u16) -> Result<u16> {
    let Some(value) = snapshot.get_non_empty(key) else {
        return Ok(default);
    };
    match value.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(Error::invalid_port(key, value)),
    }
}

/// Tier from `ENVIRONMENT`, `local` when unset.
pub(crate) fn resolve_tier(snapshot: &EnvSnapshot) -> Result<Tier> {
    match snapshot.get_non_empty(keys::ENVIRONMENT) {
        Some(value) => value.parse(),
        None => Ok(Tier::default()),
    }
}

/// Certificate and key paths, which must be configured together.
pub(crate) fn resolve_tls(snapshot: &EnvSnapshot) -> Result<Option<TlsFiles>> {
    match (
        snapshot.get_non_empty(keys::SSL_CERT_FILE),
        snapshot.get_non_empty(keys::SSL_KEY_FILE),
    ) {
        (Some(cert), Some(key)) => Ok(Some(TlsFiles {
            cert: cert.to_string(),
            key: key.to_string(),
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(tls_mismatch(keys::SSL_CERT_FILE, keys::SSL_KEY_FILE)),
        (None, Some(_)) => Err(tls_mismatch(keys::SSL_KEY_FILE, keys::SSL_CERT_FILE)),
    }
}

fn tls_mismatch(set: &str, missing: &str) -> Error {
    Error::TlsPairMismatch {
        set: set.to_string(),
        missing: missing.to_string(),
    }
}
