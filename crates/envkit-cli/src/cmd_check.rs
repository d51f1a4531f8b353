// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Verify that persisted settings are safe to deploy.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Validate settings before deploying
#[derive(Debug, Args)]
pub struct CmdCheck {
    #[clap(flatten)]
    env: crate::EnvFileFlags,

    /// Treat warnings as errors
    #[clap(long)]
    strict: bool,
}

impl CmdCheck {
    pub fn run(&mut self) -> Result<i32> {
        let snapshot = self.env.snapshot()?;
        let findings = envkit::check(&snapshot);

        if findings.is_empty() {
            println!("{} Settings look good", "✓".green());
            return Ok(0);
        }

        for finding in &findings {
            let label = match finding.severity {
                envkit::Severity::Error => "error".red().bold(),
                envkit::Severity::Warning => "warning".yellow().bold(),
            };
            println!("  {label}: {} {}", finding.key.bold(), finding.message);
        }

        let errors = findings.iter().filter(|f| f.is_error()).count();
        let warnings = findings.len() - errors;
        println!();
        println!("{errors} error(s), {warnings} warning(s)");

        if errors > 0 || (self.strict && warnings > 0) {
            return Ok(1);
        }
        Ok(0)
    }
}
