//! Logging setup for the renderscope CLI.
//!
//! Logs go to stderr so that `--format json` output stays clean on stdout.
//!
//! ## Environment Variables
//!
//! 1. **`RENDERSCOPE_LOG`** (highest priority) - renderscope-specific filter
//! 2. **`RUST_LOG`** - standard tracing filter
//! 3. **Default** - `warn` globally, `info` for renderscope crates

use std::env;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,renderscope_core=info,renderscope_cli=info";

/// Install the global subscriber.
///
/// `verbose` raises renderscope crates to `debug` when no environment filter
/// is set. Safe to call more than once.
pub(crate) fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = create_filter(verbose);
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()?;
    Ok(())
}

fn create_filter(verbose: bool) -> EnvFilter {
    if let Ok(level) = env::var("RENDERSCOPE_LOG") {
        return expand_renderscope_log(&level);
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    if verbose {
        return EnvFilter::new("warn,renderscope_core=debug,renderscope_cli=debug");
    }
    EnvFilter::new(DEFAULT_FILTER)
}

/// A bare level (`debug`) applies to the renderscope crates only; anything
/// else is passed through as a full filter directive.
fn expand_renderscope_log(value: &str) -> EnvFilter {
    match value.trim() {
        level @ ("error" | "warn" | "info" | "debug" | "trace") => {
            EnvFilter::new(format!("warn,renderscope_core={level},renderscope_cli={level}"))
        }
        directive => EnvFilter::new(directive),
    }
}
