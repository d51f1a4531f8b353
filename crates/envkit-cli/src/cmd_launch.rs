// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envkit launch` command.

use std::io::Write;

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Start the server from the env file and process environment
#[derive(Debug, Args)]
pub struct CmdLaunch {
    #[clap(flatten)]
    env: crate::EnvFileFlags,

    /// Bind to this host instead of the detected default
    #[clap(long)]
    host: Option<String>,

    /// Show the command that would run without starting it
    #[clap(long)]
    dry_run: bool,

    /// Output format for --dry-run: table, yaml, json
    #[clap(long, value_enum, default_value_t)]
    format: crate::Format,
}

impl CmdLaunch {
    pub fn run(&mut self) -> Result<i32> {
        let snapshot = self.env.snapshot()?;
        let options = envkit::LaunchOptions {
            host: self.host.clone(),
            ..Default::default()
        };

        let config = envkit::LaunchConfig::resolve(&snapshot, &options)?;
        let spec = config.command();
        tracing::info!(command = %spec, "resolved launch command");

        if self.dry_run {
            match self.format.render(&spec)? {
                Some(rendered) => print!("{rendered}"),
                None => {
                    println!("{}", "Would run:".bold());
                    println!("  {}", spec.to_string().green());
                }
            }
            return Ok(0);
        }

        print!("{}", config.banner(&spec));
        std::io::stdout()
            .flush()
            .map_err(|e| miette::miette!("Failed to write status banner: {e}"))?;

        Err(spec.exec().into())
    }
}
