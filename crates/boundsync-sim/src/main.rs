#![warn(missing_docs)]

//! Entry point for the `boundsync-sim` binary.
//!
//! Loads a RON scenario, replays it against in-memory windows and prints
//! every synthesized bounds notification to stdout as JSON.

mod cli;
mod error;
mod runner;
mod scenario;

use std::{fs, process};

use clap::Parser;
use tracing::error;

use crate::{
    cli::Cli,
    error::{Error, Result},
    scenario::Scenario,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and replay the scenario.
fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log);

    let text = fs::read_to_string(&cli.scenario).map_err(|source| Error::Io {
        path: cli.scenario.clone(),
        source,
    })?;
    let scenario = Scenario::parse(&text)?;
    for change in runner::run(&scenario, cli.mode.map(Into::into))? {
        let line = if cli.pretty {
            serde_json::to_string_pretty(&change)?
        } else {
            serde_json::to_string(&change)?
        };
        println!("{line}");
    }
    Ok(())
}
