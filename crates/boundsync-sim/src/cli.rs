//! Command-line interface definitions for boundsync-sim.

use std::path::PathBuf;

use boundsync::RepositionMode;
use clap::{Parser, ValueEnum};
use logging::LogArgs;

/// Command-line interface for the `boundsync-sim` binary.
#[derive(Parser, Debug)]
#[command(
    name = "boundsync-sim",
    about = "Replay a window bounds-change scenario and print every notification as JSON",
    version
)]
pub struct Cli {
    /// Logging controls shared across boundsync binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Scenario file (RON).
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Override the scenario's follower repositioning mode.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Pretty-print each notification instead of one JSON object per line.
    #[arg(long)]
    pub pretty: bool,
}

/// CLI spelling of [`RepositionMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// One `set_bounds` call per follower.
    Sequential,
    /// One position transaction per group move.
    Batched,
}

impl From<ModeArg> for RepositionMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Sequential => Self::Sequential,
            ModeArg::Batched => Self::Batched,
        }
    }
}
