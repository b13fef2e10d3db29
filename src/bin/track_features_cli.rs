use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Map, Value};
use track_features::analysis::features::feature_names;
use track_features::analysis::{BatchReport, FeatureRow, TrackFailure};
use track_features::config::AppConfig;
use track_features::{
    load_collection, FeatureBatchAssembler, TrackAnalysis, TrackFeatureExtractor, FEATURE_COUNT,
};

#[derive(Parser, Debug)]
#[command(
    name = "track_features_cli",
    about = "Fixed-width feature vectors from per-track analysis JSON"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract features for every track in an analysis collection
    Extract {
        /// JSON object mapping track ids to analyses
        #[arg(long)]
        input: PathBuf,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Abort on the first failing track
        #[arg(long)]
        strict: bool,
        /// Dedicated worker count (defaults to the config value)
        #[arg(long)]
        threads: Option<usize>,
        /// Config file (defaults to ./track_features.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the feature column names in output order
    Schema,
    /// Print the features of a single track
    Inspect {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        track: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One JSON document with rows and failures
    Json,
    /// One feature row per line
    Jsonl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Extract {
            input,
            output,
            format,
            strict,
            threads,
            config,
        } => {
            let mut config = load_config(config.as_deref());
            config.batch.strict |= strict;
            if threads.is_some() {
                config.batch.worker_threads = threads;
            }
            run_extract(&config, &input, output, format)
        }
        Commands::Schema => run_schema(),
        Commands::Inspect {
            input,
            track,
            config,
        } => run_inspect(&load_config(config.as_deref()), &input, &track),
    }
}

fn load_config(path: Option<&Path>) -> AppConfig {
    match path {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    }
}

fn read_collection(input: &Path) -> Result<Map<String, Value>> {
    let contents =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {} as JSON", input.display()))?;
    match value {
        Value::Object(collection) => Ok(collection),
        _ => bail!(
            "{} must hold a JSON object mapping track ids to analyses",
            input.display()
        ),
    }
}

fn run_extract(
    config: &AppConfig,
    input: &Path,
    output_path: Option<PathBuf>,
    format: OutputFormat,
) -> Result<ExitCode> {
    let collection = read_collection(input)?;
    let shaped = load_collection(&collection);
    tracing::info!("[CLI] shaped {} tracks from {}", shaped.len(), input.display());

    let report = FeatureBatchAssembler::from_config(config)
        .assemble_shaped(&shaped)
        .context("extracting features")?;

    let rendered = match format {
        OutputFormat::Json => render_report(&report, shaped.len(), config.output.pretty)?,
        OutputFormat::Jsonl => render_rows(report.table.rows())?,
    };
    emit(&rendered, output_path)?;

    if report.is_clean() {
        Ok(ExitCode::from(0))
    } else {
        Ok(ExitCode::from(2))
    }
}

fn run_schema() -> Result<ExitCode> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for name in feature_names() {
        writeln!(out, "{}", name)?;
    }
    Ok(ExitCode::from(0))
}

fn run_inspect(config: &AppConfig, input: &Path, track_id: &str) -> Result<ExitCode> {
    let collection = read_collection(input)?;
    let value = collection
        .get(track_id)
        .with_context(|| format!("track {} not found in {}", track_id, input.display()))?;

    let extractor = TrackFeatureExtractor::from_config(&config.extraction);
    let analysis = TrackAnalysis::from_json(track_id, value)?;
    let features = extractor.extract(track_id, &analysis)?;

    let row = FeatureRow {
        track_id: track_id.to_string(),
        features,
    };
    println!("{}", serde_json::to_string_pretty(&row)?);
    Ok(ExitCode::from(0))
}

fn render_report(report: &BatchReport, track_count: usize, pretty: bool) -> Result<String> {
    let payload = ExtractReportPayload {
        track_count,
        feature_count: FEATURE_COUNT,
        rows: report.table.rows(),
        failures: &report.failures,
        overwritten: &report.overwritten,
    };
    let text = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    Ok(text)
}

fn render_rows(rows: &[FeatureRow]) -> Result<String> {
    let mut text = String::new();
    for row in rows {
        text.push_str(&serde_json::to_string(row)?);
        text.push('\n');
    }
    Ok(text)
}

fn emit(rendered: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!("[CLI] report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                out.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ExtractReportPayload<'a> {
    track_count: usize,
    feature_count: usize,
    rows: &'a [FeatureRow],
    failures: &'a [TrackFailure],
    overwritten: &'a [String],
}
