// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Random secret generation and operator confirmation.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::keys;

#[cfg(test)]
#[path = "./secrets_test.rs"]
mod secrets_test;

/// A sensitive key and the amount of randomness it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretSpec {
    pub key: &'static str,
    /// Number of random bytes; the rendered value is twice as long.
    pub bytes: usize,
}

/// Keys that get generated secrets during setup.
pub const SECRETS: [SecretSpec; 3] = [
    SecretSpec {
        key: keys::SECRET_KEY,
        bytes: 32,
    },
    SecretSpec {
        key: keys::FIRST_SUPERUSER_PASSWORD,
        bytes: 16,
    },
    SecretSpec {
        key: keys::POSTGRES_PASSWORD,
        bytes: 16,
    },
];

/// Generate `bytes` bytes from the OS random source as lowercase hex.
pub fn generate_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    data_encoding::HEXLOWER.encode(&buf)
}

/// Interpret an operator's answer to a yes/no prompt.
///
/// Only an explicit yes counts; empty input takes the "no" default.
pub fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Source of yes/no answers for interactive steps.
pub trait Confirm {
    /// Ask `prompt`. Failing or interrupted input must answer `false`.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers yes to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Answers no to everything; the non-interactive default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}
