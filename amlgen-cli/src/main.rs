//! amlgen CLI: generate the experiment configurations of a regression campaign.
//!
//! Loads a campaign file and its dataset, builds the generator tree and
//! prints one line per generated configuration.

use amlgen_core::{CampaignConfiguration, RegressionInputs, build_generator, load_campaign};
use anyhow::{Context, bail};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// amlgen: experiment-configuration generation for regression campaigns
#[derive(Parser, Debug)]
#[command(name = "amlgen", version, about, long_about = None)]
struct Cli {
    /// Campaign configuration file (TOML)
    #[arg(short = 'c', long = "configuration-file")]
    configuration_file: PathBuf,

    /// CSV dataset, overrides [data_preparation].input_path
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Root seed, overrides [general].seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Experiment prefix token (repeatable)
    #[arg(short, long = "prefix", default_values_t = vec!["root".to_string()])]
    prefix: Vec<String>,

    /// Emit one JSON summary per line instead of signatures
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "amlgen", "amlgen")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "amlgen.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let campaign = load_campaign(&cli.configuration_file)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let inputs = load_inputs(&campaign, &cli.configuration_file, cli.input.as_deref())?;
    let general = campaign.general()?;
    let seed = cli.seed.or(general.seed).unwrap_or(0);

    info!(
        campaign = %cli.configuration_file.display(),
        rows = inputs.row_count(),
        seed,
        "Starting experiment generation"
    );
    let generator = build_generator(Arc::new(campaign), seed)?;
    let configurations = generator.generate(&cli.prefix, &inputs)?;
    info!(count = configurations.len(), "Experiment generation complete");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for conf in &configurations {
        if cli.json {
            writeln!(out, "{}", serde_json::to_string(&conf.summary())?)?;
        } else {
            writeln!(out, "{}", conf.signature_string())?;
        }
    }
    if !cli.quiet && !cli.json {
        eprintln!("{} experiment configurations generated", configurations.len());
    }
    Ok(())
}

/// Resolve and load the campaign dataset. A relative `input_path` in the
/// campaign file is taken relative to that file's directory.
fn load_inputs(
    campaign: &CampaignConfiguration,
    campaign_path: &Path,
    input: Option<&Path>,
) -> anyhow::Result<RegressionInputs> {
    let preparation = campaign.data_preparation()?;
    let path = match (input, preparation.input_path) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) if path.is_relative() => campaign_path
            .parent()
            .map(|dir| dir.join(&path))
            .unwrap_or(path),
        (None, Some(path)) => path,
        (None, None) => bail!("no dataset: pass --input or set [data_preparation].input_path"),
    };
    let Some(y) = preparation.y else {
        bail!("[data_preparation].y must name the target column");
    };
    RegressionInputs::from_csv(&path, &y, preparation.x_columns)
        .with_context(|| format!("loading dataset {}", path.display()))
}
