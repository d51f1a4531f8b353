// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `envkit setup` command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use console::{Key, Term};
use miette::Result;

/// Materialize an env file from its template
#[derive(Debug, Args)]
pub struct CmdSetup {
    /// Environment tier: local, remote, dev, staging, production
    tier: envkit::Tier,

    /// Server port
    #[clap(short, long, default_value_t = envkit::DEFAULT_PORT)]
    port: u16,

    /// Enable SSL and point the env file at certificates in --cert-dir
    #[clap(long)]
    ssl: bool,

    /// Server host name
    #[clap(long, default_value = "localhost")]
    host: String,

    /// Template env file to copy
    #[clap(long, default_value = envkit::DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Env file to write
    #[clap(long, default_value = envkit::DEFAULT_ENV_FILE)]
    target: PathBuf,

    /// Certificate directory, relative to the target file
    #[clap(long, default_value = envkit::DEFAULT_CERT_DIR)]
    cert_dir: PathBuf,

    /// Generate secrets without asking
    #[clap(long, conflicts_with = "no_input")]
    generate_secrets: bool,

    /// Never prompt; keep existing secrets
    #[clap(long)]
    no_input: bool,
}

impl CmdSetup {
    pub fn run(&mut self) -> Result<i32> {
        let options = envkit::SetupOptions {
            tier: self.tier,
            host: self.host.clone(),
            port: self.port,
            ssl: self.ssl,
            cert_dir: self.cert_dir.clone(),
        };

        let (template, target) = (&self.template, &self.target);
        let report = if self.generate_secrets {
            envkit::materialize(template, target, &options, &mut envkit::AssumeYes)?
        } else if self.no_input {
            envkit::materialize(template, target, &options, &mut envkit::AssumeNo)?
        } else {
            envkit::materialize(template, target, &options, &mut TerminalConfirm::stderr())?
        };

        println!(
            "{} {} for {}",
            "Wrote".green().bold(),
            self.target.display(),
            options.tier.to_string().bold()
        );
        println!("  {}", report.updated.join(", "));
        if let Some(dir) = &report.cert_dir {
            println!();
            println!("Place cert.pem and key.pem in {}", dir.display());
        }
        if !report.secrets_generated {
            println!();
            println!("Secrets were left unchanged. Run 'envkit check' before deploying.");
        }

        Ok(0)
    }
}

/// Asks on the terminal; answers "no" when there is no terminal to ask on.
struct TerminalConfirm {
    term: Term,
}

impl TerminalConfirm {
    fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl envkit::Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if !self.term.is_term() {
            tracing::info!("no terminal attached, skipping secret generation");
            return false;
        }
        if self.term.write_str(&format!("{prompt} [y/N] ")).is_err() {
            return false;
        }
        // Raw-mode read: Ctrl-C arrives as an `Interrupted` error, not SIGINT.
        let answer = answer_for_key(self.term.read_key());
        let _ = self.term.write_line(if answer { "y" } else { "n" });
        answer
    }
}

/// A single key press answers the prompt; anything but `y` declines.
pub(crate) fn answer_for_key(key: std::io::Result<Key>) -> bool {
    match key {
        Ok(Key::Char(c)) => envkit::secrets::parse_answer(&c.to_string()),
        Ok(_) => false,
        Err(err) => {
            tracing::debug!("prompt interrupted: {err}");
            false
        }
    }
}
