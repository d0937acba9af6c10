#![warn(missing_docs)]

//! Log-level CLI flags and tracing subscriber setup shared by boundsync binaries.
//!
//! Level flags are scoped to our own crates so dependency noise stays at the
//! default level unless an explicit filter asks otherwise.

use std::{env, io};

use clap::Args;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, registry};

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "boundsync=trace,boundsync_sim=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Filter spec for these flags, falling back to `RUST_LOG`.
    pub fn spec(&self) -> String {
        compute_spec(self, env::var("RUST_LOG").ok().as_deref())
    }
}

/// Crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &["boundsync", "boundsync_ids", "boundsync_sim", "logging"]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{t}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `rust_log`, the caller's `RUST_LOG` value
/// - crate-scoped `info`
pub fn compute_spec(args: &LogArgs, rust_log: Option<&str>) -> String {
    if let Some(spec) = &args.log_filter {
        return spec.clone();
    }
    if args.trace {
        return level_spec_for("trace");
    }
    if args.debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = &args.log_level {
        return level_spec_for(lvl);
    }
    match rust_log {
        Some(spec) if !spec.trim().is_empty() => spec.to_string(),
        _ => level_spec_for("info"),
    }
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

/// Install a stderr fmt subscriber filtered by `args`. Returns the spec used.
///
/// A subscriber that is already installed is left in place.
pub fn init(args: &LogArgs) -> String {
    let spec = args.spec();
    registry()
        .with(env_filter_from_spec(&spec))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_spec_covers_our_crates() {
        assert_eq!(
            level_spec_for("DEBUG"),
            "boundsync=debug,boundsync_ids=debug,boundsync_sim=debug,logging=debug"
        );
    }

    #[test]
    fn explicit_filter_wins() {
        let args = LogArgs {
            log_filter: Some("boundsync::tracker=trace".into()),
            ..LogArgs::default()
        };
        assert_eq!(compute_spec(&args, Some("info")), "boundsync::tracker=trace");
    }

    #[test]
    fn flags_beat_rust_log() {
        let args = LogArgs {
            trace: true,
            ..LogArgs::default()
        };
        assert_eq!(compute_spec(&args, Some("info")), level_spec_for("trace"));

        let args = LogArgs {
            log_level: Some("info".into()),
            ..LogArgs::default()
        };
        assert_eq!(compute_spec(&args, None), level_spec_for("info"));
    }

    #[test]
    fn rust_log_then_default() {
        let args = LogArgs::default();
        assert_eq!(compute_spec(&args, Some("boundsync=info")), "boundsync=info");
        assert_eq!(compute_spec(&args, Some("  ")), level_spec_for("info"));
        assert_eq!(compute_spec(&args, None), level_spec_for("info"));
    }
}
