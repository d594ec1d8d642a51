//! # locbar
//!
//! Status-bar style line counter with git branch stats, built on
//! locbarlib.
//!
//! ## Usage
//!
//! ```bash
//! # One-line summary for the current directory
//! locbar
//!
//! # Detailed report
//! locbar --report
//!
//! # Machine-readable output
//! locbar --json
//!
//! # Re-count on the configured interval until interrupted
//! locbar --watch
//!
//! # Force a fresh count, bypassing the result cache
//! locbar --no-cache
//! ```
//!
//! Configuration comes from an optional JSON file (`--config`) plus
//! flag overrides for extensions and exclude patterns.

mod render;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use locbarlib::{Config, StatsEngine};
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("locbar")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Counts workspace lines of code with git branch stats")
        .arg(
            Arg::new("path")
                .help("Workspace root to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file"),
        )
        .arg(
            Arg::new("ext")
                .short('e')
                .long("ext")
                .action(ArgAction::Append)
                .help("Count only these extensions (can be repeated, overrides config)"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .action(ArgAction::Append)
                .help("Extra exclude glob pattern (can be repeated, overrides config)"),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .action(ArgAction::SetTrue)
                .help("Print the detailed multi-section report"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .conflicts_with("report")
                .help("Print statistics as JSON"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["report", "json"])
                .help("Refresh on the configured interval until interrupted"),
        )
        .arg(
            Arg::new("no-cache")
                .long("no-cache")
                .action(ArgAction::SetTrue)
                .help("Bypass the result cache and force a fresh count"),
        )
}

/// Assemble the effective config from file and flag overrides.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {path}"))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("cannot parse config file {path}"))?
        }
        None => Config::default(),
    };

    if let Some(exts) = matches.get_many::<String>("ext") {
        config = config.extensions(exts.cloned());
    }
    if let Some(patterns) = matches.get_many::<String>("exclude") {
        let mut merged = config.exclude_patterns.clone();
        merged.extend(patterns.cloned());
        config = config.excludes(merged);
    }
    Ok(config)
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = build_command().get_matches();
    let root = PathBuf::from(matches.get_one::<String>("path").expect("has default"));
    let config = load_config(&matches)?;

    if !config.enabled {
        tracing::debug!("disabled by configuration, nothing to do");
        return Ok(());
    }

    let engine = StatsEngine::new(config);
    let bypass = matches.get_flag("no-cache");

    if matches.get_flag("watch") {
        loop {
            let stats = if bypass {
                engine.refresh_now(&root)?
            } else {
                engine.refresh(&root)?
            };
            println!("{}", render::summary(&stats, engine.config()));
            thread::sleep(engine.config().update_interval());
        }
    }

    let stats = if bypass {
        engine.refresh_now(&root)?
    } else {
        engine.refresh(&root)?
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if matches.get_flag("report") {
        print!("{}", render::report(&root, &stats, engine.config()));
    } else {
        println!("{}", render::summary(&stats, engine.config()));
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
