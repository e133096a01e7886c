//! Top-level CLI definition and dispatch.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use panel_result_log::core::config::Config;
use panel_result_log::core::errors::ResultLogError;
use panel_result_log::manager::{IpvsZonePass, ResultLogs, RunReport, ZonePass};
use panel_result_log::record::{Input, Output, ZoneTestResult};
use panel_result_log::schema::columns::{
    Column, eecp_columns, ipvs_eecp_columns, summary_columns,
};
use panel_result_log::sink::mode::LogMode;

/// Result log writer for optical panel inspection stations.
#[derive(Debug, Parser)]
#[command(
    name = "result-log",
    author,
    version,
    about = "Write and inspect CIM / EECP / EECP_SUMMARY / VALIDATION result logs",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Increase verbosity.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Quiet mode (warnings and errors only).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Print the column layout of a CSV log.
    Schema(SchemaArgs),
    /// Show the effective configuration.
    Config(ConfigArgs),
    /// Write result logs from a JSON pass file.
    Write(WriteArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemaKind {
    Eecp,
    Summary,
    Ipvs,
}

#[derive(Debug, Clone, Args)]
struct SchemaArgs {
    /// Log whose columns to print.
    #[arg(value_enum)]
    kind: SchemaKind,
    /// Use the HVI layout regardless of configuration.
    #[arg(long)]
    hvi: bool,
    /// Zone count for the HVI layout (defaults to the configured zone count).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=64))]
    zones: Option<u32>,
    /// Summary without the trailing judgment columns.
    #[arg(long)]
    basic: bool,
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    /// Print only the config fingerprint.
    #[arg(long)]
    hash: bool,
}

#[derive(Debug, Clone, Args)]
struct WriteArgs {
    /// JSON pass file.
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

/// Failure of one CLI invocation; each variant has its own exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad pass file, missing explicit config, wrong section for the mode.
    #[error("{0}")]
    User(String),
    /// Config, sink construction or stdout failure.
    #[error("{0}")]
    Runtime(String),
    /// The run finished but at least one log kind failed.
    #[error("{0}")]
    Partial(String),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) => 2,
            Self::Partial(_) => 3,
        }
    }
}

impl From<ResultLogError> for CliError {
    fn from(err: ResultLogError) -> Self {
        Self::Runtime(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Runtime(format!("cannot write to stdout: {err}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Runtime(format!("cannot encode JSON output: {err}"))
    }
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` wins over the flags.
pub fn init_tracing(cli: &Cli) {
    let fallback = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Schema(args) => run_schema(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Write(args) => run_write(cli, args),
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let config = Config::load(cli.config.as_deref()).map_err(|e| {
        if matches!(e, ResultLogError::MissingConfig { .. }) {
            CliError::User(e.to_string())
        } else {
            CliError::Runtime(e.to_string())
        }
    })?;
    debug!(path = %config.paths.config_file.display(), "configuration loaded");
    Ok(config)
}

// ──────────────────── schema ────────────────────

fn schema_columns(args: &SchemaArgs, config: &Config) -> Vec<Column> {
    let mode = if args.hvi {
        LogMode::Hvi
    } else {
        LogMode::from_config(&config.mtp)
    };
    let zones = args.zones.unwrap_or(config.mtp.zone) as usize;
    match args.kind {
        SchemaKind::Eecp => eecp_columns(mode.eecp_layout(zones)),
        SchemaKind::Summary => summary_columns(mode.key_kind(), !args.basic && config.summary.extended),
        SchemaKind::Ipvs => ipvs_eecp_columns(),
    }
}

fn run_schema(cli: &Cli, args: &SchemaArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let columns = schema_columns(args, &config);
    let headers: Vec<String> = columns.iter().map(Column::header).collect();

    if cli.json {
        return write_json_line(&json!({
            "command": "schema",
            "kind": format!("{:?}", args.kind).to_ascii_lowercase(),
            "count": headers.len(),
            "columns": headers,
        }));
    }
    let mut stdout = io::stdout().lock();
    for (index, header) in headers.iter().enumerate() {
        writeln!(stdout, "{index:>5}  {header}")?;
    }
    writeln!(stdout, "{} columns", headers.len())?;
    Ok(())
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let hash = config.stable_hash()?;
    let mode = LogMode::from_config(&config.mtp).label();

    if cli.json {
        let payload = if args.hash {
            json!({ "command": "config", "hash": hash })
        } else {
            json!({
                "command": "config",
                "path": config.paths.config_file.to_string_lossy(),
                "hash": hash,
                "mode": mode,
                "config": serde_json::to_value(&config)?,
            })
        };
        return write_json_line(&payload);
    }
    let mut stdout = io::stdout().lock();
    if args.hash {
        writeln!(stdout, "{hash}")?;
    } else {
        writeln!(stdout, "# {}", config.paths.config_file.display())?;
        writeln!(stdout, "# hash: {hash}\n# mode: {mode}")?;
        write!(stdout, "{}", config.to_toml()?)?;
    }
    Ok(())
}

// ──────────────────── write ────────────────────

/// On-disk pass description consumed by `write`.
#[derive(Debug, Deserialize)]
struct PassFile {
    start: NaiveDateTime,
    end: NaiveDateTime,
    /// Normal-mode zones keyed by zone number.
    #[serde(default)]
    zones: BTreeMap<u32, ZonePass>,
    /// HVI pass; required when the station runs in HVI mode.
    #[serde(default)]
    hvi: Option<HviPass>,
    #[serde(default)]
    ipvs: BTreeMap<u32, IpvsZonePass>,
    /// Also write CIM for each Normal and IPVS zone.
    #[serde(default)]
    cim: bool,
}

#[derive(Debug, Deserialize)]
struct HviPass {
    #[serde(default)]
    input: Input,
    #[serde(default)]
    result: ZoneTestResult,
    outputs: Vec<Output>,
    sequence_count: Option<usize>,
}

fn read_pass_file(path: &Path) -> Result<PassFile, CliError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::User(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| CliError::User(format!("invalid pass file {}: {e}", path.display())))
}

fn run_write(cli: &Cli, args: &WriteArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let pass = read_pass_file(&args.file)?;
    let logs = ResultLogs::new(config);
    let mut reports: Vec<(&'static str, RunReport)> = Vec::new();
    let mut cim_written = 0_usize;

    match logs.mode() {
        LogMode::Normal => {
            if pass.cim {
                for (zone, data) in &pass.zones {
                    let record = data.pass_record(pass.start, pass.end);
                    if logs.create_cim_for_zone(&record, *zone, None, &data.output)? {
                        cim_written += 1;
                    }
                }
            }
            if !pass.zones.is_empty() {
                reports.push(("normal", logs.create_all_result_logs(pass.start, pass.end, &pass.zones)?));
            }
        }
        LogMode::Hvi => {
            let hvi = pass.hvi.as_ref().ok_or_else(|| {
                CliError::User("station is in HVI mode but the pass file has no `hvi` section".to_string())
            })?;
            let zone_count = (logs.config().mtp.zone as usize).max(1);
            let sequence_count = hvi
                .sequence_count
                .unwrap_or_else(|| hvi.outputs.len() / zone_count);
            reports.push((
                "hvi",
                logs.create_hvi_result_logs(
                    pass.start,
                    pass.end,
                    &hvi.input,
                    &hvi.result,
                    &hvi.outputs,
                    sequence_count,
                )?,
            ));
        }
    }
    if !pass.ipvs.is_empty() {
        if pass.cim {
            for (zone, data) in &pass.ipvs {
                let record = data.pass_record(pass.start, pass.end);
                if logs.create_ipvs_cim_for_zone(&record, *zone, None)? {
                    cim_written += 1;
                }
            }
        }
        reports.push(("ipvs", logs.create_ipvs_result_logs(pass.start, pass.end, &pass.ipvs)));
    }

    let failed: usize = reports.iter().map(|(_, report)| report.failures().count()).sum();
    if cli.json {
        write_json_line(&json!({
            "command": "write",
            "mode": logs.mode().label(),
            "cim_written": cim_written,
            "runs": reports
                .iter()
                .map(|(name, report)| report_json(name, report))
                .collect::<Vec<_>>(),
        }))?;
    } else {
        print_reports_human(logs.mode(), cim_written, &reports)?;
    }

    if failed > 0 {
        return Err(CliError::Partial(format!("{failed} result log kind(s) failed")));
    }
    Ok(())
}

fn print_reports_human(
    mode: LogMode,
    cim_written: usize,
    reports: &[(&'static str, RunReport)],
) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "mode: {}", mode.label())?;
    if cim_written > 0 {
        writeln!(stdout, "  CIM            {cim_written} snapshot(s)")?;
    }
    for (_, report) in reports {
        for outcome in &report.outcomes {
            match &outcome.error {
                None => writeln!(stdout, "  {:<14} {} record(s)", outcome.kind.label(), outcome.records)?,
                Some(err) => writeln!(
                    stdout,
                    "  {:<14} FAILED after {} record(s): {err}",
                    outcome.kind.label(),
                    outcome.records
                )?,
            }
        }
        if report.skipped_groups > 0 {
            writeln!(
                stdout,
                "  warning: {} HVI column group(s) written as placeholders",
                report.skipped_groups
            )?;
        }
    }
    Ok(())
}

fn report_json(name: &str, report: &RunReport) -> Value {
    json!({
        "run": name,
        "ok": report.all_ok(),
        "skipped_groups": report.skipped_groups,
        "outcomes": report
            .outcomes
            .iter()
            .map(|outcome| json!({
                "kind": outcome.kind,
                "records": outcome.records,
                "code": outcome.error.as_ref().map(|e| e.code()),
                "error": outcome.error.as_ref().map(ToString::to_string),
            }))
            .collect::<Vec<_>>(),
    })
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}
