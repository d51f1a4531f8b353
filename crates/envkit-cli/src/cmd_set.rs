// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envkit set` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Set a single key in an existing env file
#[derive(Debug, Args)]
pub struct CmdSet {
    #[clap(flatten)]
    env: crate::EnvFileFlags,

    /// Key to set
    key: String,

    /// New value, written as given
    value: String,
}

impl CmdSet {
    pub fn run(&mut self) -> Result<i32> {
        let path = &self.env.env_file;
        envkit::upsert(path, &self.key, &self.value)?;
        tracing::info!(key = %self.key, path = %path.display(), "updated env file");
        println!(
            "{} {} in {}",
            "Set".green().bold(),
            self.key.bold(),
            path.display()
        );
        Ok(0)
    }
}
