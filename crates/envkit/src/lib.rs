// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! envkit - Env-File Materializer and Launch-Command Synthesizer
//!
//! This crate provides the core library behind the `envkit` command, which
//! prepares and starts a containerized API service from a plain `KEY=VALUE`
//! env file.
//!
//! # Overview
//!
//! Setup time: [`materialize`] copies a template env file to its target and
//! applies idempotent upserts for the deployment tier, host, port, TLS paths
//! and, when confirmed, freshly generated secrets.
//!
//! Start time: [`build_command`] reads an [`EnvSnapshot`] (the persisted env
//! file overlaid by the live process environment) and produces a structured
//! [`LaunchSpec`] that replaces the current process.
//!
//! # Example
//!
//! ```text
//! # .env
//! ENVIRONMENT=local
//! SERVER_PROTOCOL=http
//! SERVER_HOST=localhost
//! SERVER_PORT=8000
//! CORS_ORIGINS="http://localhost:3000"
//! ```

pub mod check;
pub mod envfile;
pub mod error;
pub mod launch;
pub mod materialize;
pub mod secrets;
pub mod settings;
pub mod snapshot;
pub mod tier;

pub use check::{check, Finding, Severity};
pub use envfile::{unquote, upsert, EnvFile};
pub use error::{Error, Result};
pub use launch::{build_command, LaunchConfig, LaunchOptions, LaunchSpec, TlsFiles};
pub use materialize::{materialize, MaterializeReport, SetupOptions};
pub use secrets::{generate_hex, AssumeNo, AssumeYes, Confirm, SecretSpec, SECRETS};
pub use settings::Settings;
pub use snapshot::EnvSnapshot;
pub use tier::Tier;

/// Default template env file consumed by `setup`.
pub const DEFAULT_TEMPLATE: &str = ".env.example";

/// Default persisted env file.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Marker file whose presence means we are running inside a container.
pub const CONTAINER_MARKER: &str = "/.dockerenv";

/// Server port used when none is configured.
pub const DEFAULT_PORT: u16 = 8000;

/// Port the remote debugger listens on when none is configured.
pub const DEFAULT_DEBUG_PORT: u16 = 5678;

/// Directory, relative to the env file, holding TLS material.
pub const DEFAULT_CERT_DIR: &str = "certs";

/// Placeholder value shipped in templates for sensitive keys.
pub const PLACEHOLDER_SECRET: &str = "changethis";

/// Recognized configuration keys.
pub mod keys {
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
    pub const SERVER_HOST: &str = "SERVER_HOST";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const CORS_ORIGINS: &str = "CORS_ORIGINS";
    pub const SSL_CERT_FILE: &str = "SSL_CERT_FILE";
    pub const SSL_KEY_FILE: &str = "SSL_KEY_FILE";
    pub const SECRET_KEY: &str = "SECRET_KEY";
    pub const FIRST_SUPERUSER_PASSWORD: &str = "FIRST_SUPERUSER_PASSWORD";
    pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";

    // Read by the launcher only.
    pub const DEBUG: &str = "DEBUG";
    pub const DEBUG_PORT: &str = "DEBUG_PORT";
    pub const PYTHON: &str = "PYTHON";
    pub const SERVER_APP: &str = "SERVER_APP";
    pub const SOURCE_DIR: &str = "SOURCE_DIR";
}
