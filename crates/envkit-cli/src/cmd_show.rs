// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envkit show` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Display resolved settings
#[derive(Debug, Args)]
pub struct CmdShow {
    #[clap(flatten)]
    env: crate::EnvFileFlags,

    /// Output format: table, yaml, json
    #[clap(long, value_enum, default_value_t)]
    format: crate::Format,
}

impl CmdShow {
    pub fn run(&mut self) -> Result<i32> {
        let snapshot = self.env.snapshot()?;
        let settings = envkit::Settings::from_snapshot(&snapshot)?;

        if let Some(rendered) = self.format.render(&settings)? {
            print!("{rendered}");
            return Ok(0);
        }

        println!("{}", "Settings:".bold());
        println!();
        self.row("environment", &settings.environment.to_string());
        self.row("base url", &settings.base_url);
        self.row("host", &settings.host);
        self.row("port", &settings.port.to_string());

        let cors = if settings.cors_origins.is_empty() {
            "<none>".dimmed().to_string()
        } else {
            settings.cors_origins.join(", ")
        };
        self.row("cors origins", &cors);

        match (&settings.ssl_cert_file, &settings.ssl_key_file) {
            (Some(cert), Some(key)) => {
                self.row("ssl cert", cert);
                self.row("ssl key", key);
            }
            _ => self.row("ssl", &"disabled".dimmed().to_string()),
        }

        Ok(0)
    }

    fn row(&self, label: &str, value: &str) {
        println!("  {} {}", format!("{:<14}", format!("{label}:")).cyan(), value);
    }
}
