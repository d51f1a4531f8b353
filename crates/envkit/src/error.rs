// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for envkit operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with envkit Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during envkit operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Environment tier is not one of the known values
    #[error("Invalid environment tier: {0:?}")]
    #[diagnostic(
        code(envkit::invalid_tier),
        help("Use one of: local, remote, dev, staging, production")
    )]
    InvalidTier(String),

    /// Port is not a positive integer
    #[error("Invalid port for {key}: {value:?}")]
    #[diagnostic(
        code(envkit::invalid_port),
        help("Ports must be whole numbers between 1 and 65535")
    )]
    InvalidPort { key: String, value: String },

    /// A configuration value could not be interpreted
    #[error("Invalid value for {key}: {reason}")]
    #[diagnostic(code(envkit::invalid_value))]
    InvalidValue { key: String, reason: String },

    /// Only one half of the TLS file pair is configured
    #[error("TLS is half configured: {set} is set but {missing} is not")]
    #[diagnostic(
        code(envkit::tls_pair_mismatch),
        help("Set both SSL_CERT_FILE and SSL_KEY_FILE, or neither")
    )]
    TlsPairMismatch { set: String, missing: String },

    /// Template env file does not exist
    #[error("Template env file not found at {0:?}")]
    #[diagnostic(
        code(envkit::template_not_found),
        help("Pass --template with the path to your .env.example file")
    )]
    TemplateNotFound(PathBuf),

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(envkit::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(envkit::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Replacing the process image failed
    #[error("Failed to execute {program:?}")]
    #[diagnostic(
        code(envkit::exec_failed),
        help("Check that the interpreter is installed and on PATH, or set PYTHON")
    )]
    ExecFailed {
        program: String,
        #[source]
        error: std::io::Error,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(envkit::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid_port(key: &str, value: impl Into<String>) -> Self {
        Self::InvalidPort {
            key: key.to_string(),
            value: value.into(),
        }
    }
}
