// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! viewsettle main entry point - trace replay and configuration commands.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use viewsettle::config::{self, CliOptions, ResolvedConfig};
use viewsettle::metric::ViewReport;
use viewsettle::replay::replay_trace;
use viewsettle::telemetry::{init_telemetry, parse_level, LogFormat, TelemetryConfig};

/// Time to network settled for recorded view traces.
#[derive(Parser)]
#[command(name = "viewsettle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Delay after view creation within which a resource counts as initial
    #[arg(long, env = "VIEWSETTLE_THRESHOLD_MS", global = true)]
    threshold_ms: Option<u64>,

    /// Number of stopped views kept for reporting
    #[arg(long, global = true)]
    max_retained_views: Option<usize>,

    /// Workspace directory to load configuration from
    #[arg(short = 'C', long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Show debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Show trace output
    #[arg(long, global = true)]
    trace: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value = "compact", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON Lines trace and report every view
    Replay {
        /// Trace file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print aggregate metrics after the per-view reports
        #[arg(long)]
        summary: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the resolved configuration
    Show,
    /// Write an example configuration file to the workspace
    Init,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_level = if cli.trace {
        Some("trace".to_string())
    } else if cli.debug {
        Some("debug".to_string())
    } else {
        None
    };
    let options = CliOptions {
        initial_resource_threshold_ms: cli.threshold_ms,
        max_retained_views: cli.max_retained_views,
        log_level: cli_level,
    };
    let config = config::load_config(&cli.workspace, options).context("Failed to load configuration")?;

    // validate() already rejected unknown levels
    let level = parse_level(&config.log_level).unwrap_or(tracing::Level::WARN);
    init_telemetry(
        &TelemetryConfig::default()
            .with_level(level)
            .with_format(cli.log_format)
            .with_ansi(io::stderr().is_terminal()),
    )?;

    match cli.command {
        Commands::Replay {
            file,
            format,
            summary,
        } => run_replay(&config, &file, format, summary),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigAction::Init => {
                let path = config::save_workspace_config(
                    &cli.workspace,
                    &config::get_example_config(),
                    None,
                )?;
                println!("{} {}", "Created".green(), path.display());
                Ok(())
            }
        },
    }
}

fn run_replay(
    config: &ResolvedConfig,
    file: &Path,
    format: OutputFormat,
    summary: bool,
) -> anyhow::Result<()> {
    let registry = config.build_registry();
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    let outcome = replay_trace(reader, &registry)
        .with_context(|| format!("Failed to replay {}", file.display()))?;
    let reports = outcome.reports(&registry);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", format_report(report));
            }
        }
    }

    if summary {
        eprintln!("\n{}", registry.metrics().snapshot().format_report());
    }
    Ok(())
}

fn format_report(report: &ViewReport) -> String {
    let status = if report.stopped { "stopped" } else { "active" };
    match (report.state.initialization_time, report.state.no_value_reason) {
        (Some(nanos), _) => format!(
            "{} [{}] settled in {:.3}ms ({})",
            report.view_id.bold(),
            status,
            nanos as f64 / 1_000_000.0,
            report.state.config
        ),
        (None, reason) => format!(
            "{} [{}] {} {} ({} pending, {})",
            report.view_id.bold(),
            status,
            "no value:".yellow(),
            reason.map(|r| r.as_str()).unwrap_or("unknown"),
            report.pending_resources,
            report.state.config
        ),
    }
}
