// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask
//!
//! Automation for the tower floor definition workspace.
//!
//! - `cargo xtask ci` checks formatting, lints every member and runs the tests
//! - `cargo xtask lint` checks formatting and runs clippy per member
//! - `cargo xtask test [--package <name>]` runs the tests of one or all members
//! - `cargo xtask serve` starts the session server against the in-memory backend

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use cargo_metadata::{Metadata, MetadataCommand};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{
    Result,
    eyre::{Context, bail},
};
use duct::cmd;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_log::AsTrace;

/// Members in dependency order; the server comes last.
const MEMBERS: [&str; 4] = ["towerdef-domain", "towerdef", "towerdef-api", "towerdef-server"];

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.log_level_filter().as_trace())
        .without_time()
        .init();

    if let Err(err) = args.command.run() {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

/// Row shape the in-memory backend answers create-floors calls with.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Shape {
    #[default]
    Canonical,
    Legacy,
}

impl Shape {
    const fn as_arg(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Legacy => "legacy",
        }
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Formatting, clippy and tests for every member
    CI,

    /// Check formatting and run clippy on every member
    #[command(visible_alias = "l")]
    Lint,

    /// Run the tests of every member, or of one
    #[command(visible_alias = "t")]
    Test {
        /// Only test this member
        #[arg(short, long)]
        package: Option<String>,
    },

    /// Run the session server
    #[command(visible_alias = "s")]
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,

        /// Port to bind
        #[arg(short, long, default_value_t = 3000)]
        port: u16,

        /// Create-floors row shape
        #[arg(long, value_enum, default_value_t = Shape::Canonical)]
        shape: Shape,
    },
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => {
                lint()?;
                test(None)
            }
            Self::Lint => lint(),
            Self::Test { package } => test(package.as_deref()),
            Self::Serve { bind, port, shape } => serve(&bind, port, shape),
        }
    }
}

/// Returns the members this task runs over, checked against cargo metadata.
fn members() -> Result<Vec<&'static str>> {
    let meta: Metadata = MetadataCommand::new()
        .exec()
        .wrap_err("failed to read cargo metadata")?;

    let known: Vec<&str> = meta
        .workspace_packages()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    for member in MEMBERS {
        if !known.contains(&member) {
            bail!("workspace member {member} is missing from cargo metadata");
        }
    }
    Ok(MEMBERS.to_vec())
}

fn lint() -> Result<()> {
    cargo(&["fmt", "--all", "--check"])?;

    for member in members()? {
        info!(package = member, "clippy");
        cargo(&[
            "clippy",
            "--package",
            member,
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ])?;
    }
    cargo(&["clippy", "--package", "xtask", "--", "-D", "warnings"])?;

    if cmd!("typos").run().is_err() {
        warn!("typos is not installed or reported issues");
    }
    Ok(())
}

fn test(package: Option<&str>) -> Result<()> {
    let members: Vec<&str> = members()?;
    let selected: Vec<&str> = match package {
        Some(name) if members.contains(&name) => vec![name],
        Some(name) => bail!("{name} is not a member; expected one of {members:?}"),
        None => members,
    };

    for member in selected {
        info!(package = member, "tests");
        cargo(&["test", "--package", member])?;
    }
    Ok(())
}

fn serve(bind: &str, port: u16, shape: Shape) -> Result<()> {
    let port: String = port.to_string();
    cargo(&[
        "run",
        "--package",
        "towerdef-server",
        "--",
        "--bind",
        bind,
        "--port",
        &port,
        "--response-shape",
        shape.as_arg(),
    ])
}

fn cargo(args: &[&str]) -> Result<()> {
    info!("cargo {}", args.join(" "));
    cmd("cargo", args)
        .run()
        .wrap_err_with(|| format!("cargo {} failed", args.join(" ")))?;
    Ok(())
}
