//! wst: privacy metrics of Whirlpool pools from the command line.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use wst_export::export_all;
use wst_graph::{DirectorySource, Session};
use wst_metrics::{score_any, validate, Analysis, AnalysisConfig, AnonsetMode};
use wst_types::Denomination;
use wst_utils::{format_duration, init_logging, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "wst", about = "Whirlpool CoinJoin privacy metrics")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "WST_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the snapshot CSVs.
    #[arg(long, env = "WST_SNAPSHOTS_DIR")]
    snapshots_dir: Option<PathBuf>,

    /// Directory receiving the result CSVs (defaults to the snapshots directory).
    #[arg(long, env = "WST_EXPORT_DIR")]
    export_dir: Option<PathBuf>,

    /// Anonset computation: "exact" or "streaming".
    #[arg(long, env = "WST_MODE")]
    mode: Option<AnonsetMode>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "WST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "WST_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Compute every metric of a pool and export them as CSV.
    Compute {
        /// Pool denomination: 05, 005 or 001.
        #[arg(long)]
        denom: Denomination,
    },
    /// Print the scores of one transaction as JSON.
    Score {
        /// Full txid or its first 16 hex characters.
        txid: String,
        /// Pool to search; every pool is probed when omitted.
        #[arg(long)]
        denom: Option<Denomination>,
    },
    /// Compare exact and streaming anonsets of a pool.
    Validate {
        #[arg(long)]
        denom: Denomination,
        /// Largest accepted relative discrepancy.
        #[arg(long, default_value_t = 0.02)]
        tolerance: f64,
    },
}

impl Cli {
    /// File settings (or defaults) overridden by flags and env vars.
    fn resolve_config(&self) -> anyhow::Result<AnalysisConfig> {
        let base = match &self.config {
            Some(path) => AnalysisConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };
        Ok(AnalysisConfig {
            snapshots_dir: self.snapshots_dir.clone().unwrap_or(base.snapshots_dir),
            export_dir: self.export_dir.clone().or(base.export_dir),
            mode: self.mode.unwrap_or(base.mode),
            log_level: self.log_level.clone().unwrap_or(base.log_level),
            log_format: self.log_format.unwrap_or(base.log_format),
            ..base
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    init_logging(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Compute { denom } => compute(&config, denom),
        Command::Score { txid, denom } => score(&config, &txid, denom),
        Command::Validate { denom, tolerance } => run_validation(&config, denom, tolerance),
    }
}

fn session(config: &AnalysisConfig) -> Session<DirectorySource> {
    Session::new(DirectorySource::new(&config.snapshots_dir, config.participants))
}

fn compute(config: &AnalysisConfig, denom: Denomination) -> anyhow::Result<()> {
    let started = Instant::now();
    let mut session = session(config);
    let snapshot = session
        .load(denom)
        .with_context(|| format!("loading snapshot {denom} from {}", config.snapshots_dir.display()))?;
    let analysis = Analysis::run(snapshot, config)?;
    let written = export_all(&analysis, config.export_dir(), denom)?;
    for path in &written {
        println!("{}", path.display());
    }
    tracing::info!(
        %denom,
        elapsed = %format_duration(started.elapsed()),
        "compute finished"
    );
    Ok(())
}

fn score(config: &AnalysisConfig, txid: &str, denom: Option<Denomination>) -> anyhow::Result<()> {
    let source = DirectorySource::new(&config.snapshots_dir, config.participants);
    let (found_in, score) = score_any(&source, txid, denom)?;
    let out = serde_json::json!({
        "denomination": found_in,
        "score": score,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_validation(config: &AnalysisConfig, denom: Denomination, tolerance: f64) -> anyhow::Result<()> {
    let mut session = session(config);
    let snapshot = session.load(denom)?;
    let report = validate(snapshot, &config.sketch()?);
    println!(
        "backward: max relative {:.4} (round {:?}), max absolute {}",
        report.backward.max_relative, report.backward.worst_round, report.backward.max_absolute
    );
    println!(
        "forward:  max relative {:.4} (round {:?}), max absolute {}",
        report.forward.max_relative, report.forward.worst_round, report.forward.max_absolute
    );
    if !report.within(tolerance) {
        bail!("discrepancy exceeds tolerance {tolerance}");
    }
    Ok(())
}
