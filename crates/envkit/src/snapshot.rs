// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time view of the configuration a process starts with.

use std::collections::BTreeMap;

use crate::envfile::{unquote, EnvFile};

#[cfg(test)]
#[path = "./snapshot_test.rs"]
mod snapshot_test;

/// Configuration values captured once at process start.
///
/// Values persisted in the env file are overlaid by the live process
/// environment, so container-level overrides always win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the env file (if any) overlaid by the process environment.
    ///
    /// Process variables whose name or value is not valid UTF-8 are skipped.
    pub fn capture(file: Option<&EnvFile>) -> Self {
        let mut snapshot = file.map(Self::from_env_file).unwrap_or_default();
        for (key, value) in std::env::vars_os() {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => {
                    snapshot.vars.insert(key, value);
                }
                (key, _) => {
                    let key = key.unwrap_or_else(|k| k.to_string_lossy().into_owned());
                    tracing::debug!(key = %key, "skipping non-UTF-8 environment variable");
                }
            }
        }
        snapshot
    }

    /// Snapshot of just an env file, with surrounding quotes removed.
    pub fn from_env_file(file: &EnvFile) -> Self {
        Self::from_pairs(file.iter().map(|(k, v)| (k, unquote(v))))
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`Self::get`], treating empty values as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Boolean flag; `1`, `true`, `yes` and `on` are truthy.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}
