// Copyright (c) Contributors to the envkit project.
// SPDX-License-Identifier: Apache-2.0

//! envkit - Env-File Materializer and Server Launcher CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;

mod cmd_check;
mod cmd_launch;
mod cmd_set;
mod cmd_setup;
mod cmd_show;

use cmd_check::CmdCheck;
use cmd_launch::CmdLaunch;
use cmd_set::CmdSet;
use cmd_setup::CmdSetup;
use cmd_show::CmdShow;


#[derive(Parser)]
#[clap(
    name = "envkit",
    about = "Env-file materializer and server launcher",
    version,
    long_about = "Prepare a service's .env file from its template and start the server from it"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Where to read persisted settings from.
#[derive(Parser, Clone, Debug)]
pub struct EnvFileFlags {
    /// Env file to read (ignored when missing)
    #[clap(long = "env-file", env = "ENVKIT_ENV_FILE", default_value = envkit::DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,
}

impl EnvFileFlags {
    /// Snapshot of the env file overlaid by the process environment.
    pub fn snapshot(&self) -> Result<envkit::EnvSnapshot> {
        let file = if self.env_file.is_file() {
            Some(envkit::EnvFile::load(&self.env_file)?)
        } else {
            tracing::debug!(
                path = %self.env_file.display(),
                "env file not found, using process environment only"
            );
            None
        };
        Ok(envkit::EnvSnapshot::capture(file.as_ref()))
    }
}

/// Output format for commands that print structured data.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Table,
    Yaml,
    Json,
}

impl Format {
    /// Render `value` as YAML or JSON; `None` for table output.
    pub fn render<T: serde::Serialize>(&self, value: &T) -> Result<Option<String>> {
        match self {
            Format::Table => Ok(None),
            Format::Yaml => serde_yaml::to_string(value)
                .map(Some)
                .map_err(|e| miette::miette!("Failed to render YAML: {e}")),
            Format::Json => serde_json::to_string_pretty(value)
                .map(Some)
                .map_err(|e| miette::miette!("Failed to render JSON: {e}")),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Materialize an env file from its template
    Setup(CmdSetup),

    /// Start the server from the env file and process environment
    Launch(CmdLaunch),

    /// Set a single key in an existing env file
    Set(CmdSet),

    /// Display resolved settings
    Show(CmdShow),

    /// Validate settings before deploying
    Check(CmdCheck),
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        // Dispatch to command
        match self.cmd {
            Command::Setup(mut cmd) => cmd.run(),
            Command::Launch(mut cmd) => cmd.run(),
            Command::Set(mut cmd) => cmd.run(),
            Command::Show(mut cmd) => cmd.run(),
            Command::Check(mut cmd) => cmd.run(),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
