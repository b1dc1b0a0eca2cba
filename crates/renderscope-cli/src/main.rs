//! renderscope CLI - replay render traces and check tracker configs.

mod log;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use renderscope_core::{
    default_probe, read_trace, replay, Config, ReplayOptions, ReplayReport, TestStatus,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "renderscope")]
#[command(about = "Render tracking and diagnostics for UI component trees")]
#[command(version)]
struct Cli {
    /// Debug-level logging for renderscope crates
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines render trace and report metrics
    Replay {
        /// Path to the trace file
        trace: PathBuf,

        /// Config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Run every diagnostic from the start of the trace
        #[arg(short, long)]
        diagnostics: bool,
    },

    /// Validate a config file
    CheckConfig {
        /// Path to the config file
        #[arg(default_value = Config::CONFIG_FILE)]
        path: PathBuf,
    },

    /// Print the default config as TOML
    DefaultConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = log::init(cli.verbose) {
        eprintln!("Warning: logging unavailable: {err}");
    }

    let outcome = match cli.command {
        Commands::Replay {
            trace,
            config,
            format,
            diagnostics,
        } => run_replay(&trace, config.as_deref(), format, diagnostics),
        Commands::CheckConfig { path } => check_config(&path),
        Commands::DefaultConfig => default_config(),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn run_replay(
    trace: &Path,
    config_path: Option<&Path>,
    format: Format,
    run_diagnostics: bool,
) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let events =
        read_trace(trace).with_context(|| format!("failed to read trace {}", trace.display()))?;
    tracing::info!(events = events.len(), trace = %trace.display(), "replaying trace");

    let report = replay(
        &events,
        &config,
        default_probe(),
        ReplayOptions { run_diagnostics },
    );

    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
            println!("{json}");
        }
        Format::Text => print_report(&report),
    }

    let failed = report
        .results
        .iter()
        .any(|r| r.status == TestStatus::Failed);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_report(report: &ReplayReport) {
    let metrics = &report.metrics;
    println!("Replayed {} renders", report.events);
    println!("  Components tracked: {}", metrics.components_tracked);
    println!("  Total renders:      {}", metrics.total_renders);
    println!(
        "  Average interval:   {:.2}ms",
        metrics.average_render_time_ms
    );
    println!(
        "  Slowest:            {}",
        metrics.slowest_component.as_deref().unwrap_or("-")
    );
    println!(
        "  Fastest:            {}",
        metrics.fastest_component.as_deref().unwrap_or("-")
    );
    if metrics.has_excessive_renders() {
        println!(
            "  Excessive renders:  {}",
            metrics.excessive_render_components.join(", ")
        );
    }

    if !report.stats.is_empty() {
        println!();
        println!("{:<32} {:>8} {:>12}", "Component", "Renders", "Avg (ms)");
        let mut rows = report.stats.clone();
        rows.sort_by(|a, b| b.render_count.cmp(&a.render_count));
        for stat in &rows {
            println!(
                "{:<32} {:>8} {:>12.2}",
                stat.component_name, stat.render_count, stat.average_interval_ms
            );
        }
    }

    if !report.results.is_empty() {
        println!();
        println!("Diagnostics:");
        for result in &report.results {
            let status = match result.status {
                TestStatus::Running => "RUNNING",
                TestStatus::Passed => "PASS",
                TestStatus::Failed => "FAIL",
                TestStatus::Inconclusive => "INCONCLUSIVE",
            };
            println!(
                "  [{status:<12}] {} - {}",
                result.name,
                result.details.as_deref().unwrap_or("")
            );
        }
    }
}

fn check_config(path: &Path) -> Result<ExitCode> {
    Config::load_from_file(path)
        .with_context(|| format!("config {} is invalid", path.display()))?;
    println!("{}: OK", path.display());
    Ok(ExitCode::SUCCESS)
}

fn default_config() -> Result<ExitCode> {
    let text = Config::default()
        .to_toml()
        .context("failed to render default config")?;
    print!("{text}");
    Ok(ExitCode::SUCCESS)
}
