// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Deployment tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "./tier_test.rs"]
mod tier_test;

/// The deployment context an env file is materialized for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Local,
    Remote,
    Dev,
    Staging,
    Production,
}

impl Tier {
    /// Every tier, in promotion order.
    pub const ALL: [Tier; 5] = [
        Tier::Local,
        Tier::Remote,
        Tier::Dev,
        Tier::Staging,
        Tier::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Local => "local",
            Tier::Remote => "remote",
            Tier::Dev => "dev",
            Tier::Staging => "staging",
            Tier::Production => "production",
        }
    }

    /// Development tiers are run by a developer, locally or on a remote box.
    pub fn is_development(&self) -> bool {
        matches!(self, Tier::Local | Tier::Remote)
    }

    /// Whether the server should watch sources and hot-reload.
    pub fn reloads(&self) -> bool {
        self.is_development()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| Error::InvalidTier(s.to_string()))
    }
}
