use anyhow::{anyhow, Context, Result};
use cadence_lib::{
    analysis::{HrvEngine, Subject},
    config::Settings,
    io::{report, roster, text as text_io},
    metrics::hrv::rmssd,
    signal::IntervalSeries,
};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "cadence",
    version,
    about = "Cadence: HRV spectral analysis from beat-to-beat intervals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Engine settings shared by subcommands; flags override the config file.
#[derive(Args, Clone, Debug)]
struct EngineArgs {
    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    sampling_rate_hz: Option<f64>,
    #[arg(long)]
    transform_length: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every adult subject of a roster CSV and write one result row each
    Analyze {
        #[arg(long)]
        roster: PathBuf,
        /// Directory holding `<File>.txt` interval files (defaults to the roster's directory)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Output CSV; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        min_age: Option<f64>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Frequency-domain summary of one newline-delimited interval series (ms)
    Psd {
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// RMSSD of one newline-delimited interval series (ms)
    Rmssd {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RmssdOutput {
    n: usize,
    rmssd: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            roster,
            data_dir,
            out,
            min_age,
            engine,
        } => cmd_analyze(&roster, data_dir.as_deref(), out.as_deref(), min_age, &engine)?,
        Commands::Psd { input, engine } => cmd_psd(input.as_deref(), &engine)?,
        Commands::Rmssd { input } => cmd_rmssd(input.as_deref())?,
    }
    Ok(())
}

fn load_settings(args: &EngineArgs) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(fs) = args.sampling_rate_hz {
        settings.engine.sampling_rate_hz = fs;
    }
    if let Some(n) = args.transform_length {
        settings.engine.transform_length = n;
    }
    Ok(settings)
}

fn build_engine(settings: &Settings) -> Result<HrvEngine> {
    HrvEngine::new(settings.engine).context("engine configuration rejected")
}

fn read_series(input: Option<&Path>) -> Result<IntervalSeries> {
    match input {
        Some(path) => text_io::read_intervals(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_intervals(&buf)
        }
    }
}

fn cmd_analyze(
    roster_path: &Path,
    data_dir: Option<&Path>,
    out: Option<&Path>,
    min_age: Option<f64>,
    engine_args: &EngineArgs,
) -> Result<()> {
    let mut settings = load_settings(engine_args)?;
    if let Some(age) = min_age {
        settings.roster.min_age_years = age;
    }
    // Configuration errors stop the run before any subject is read.
    let engine = build_engine(&settings)?;

    let entries = roster::read_roster(roster_path, &settings.roster)?;
    let data_dir = data_dir
        .map(Path::to_path_buf)
        .or_else(|| roster_path.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    let mut subjects = Vec::with_capacity(entries.len());
    for entry in entries {
        let path = entry.interval_path(&data_dir);
        if !path.exists() {
            info!("skipping {}: {} not found", entry.subject_id, path.display());
            continue;
        }
        let intervals = match text_io::read_intervals(&path) {
            Ok(series) => series,
            Err(e) => {
                warn!("skipping {}: {:#}", entry.subject_id, e);
                continue;
            }
        };
        subjects.push(Subject {
            subject_id: entry.subject_id,
            age: entry.age,
            gender: entry.gender,
            intervals,
        });
    }

    let mut results = Vec::with_capacity(subjects.len());
    for outcome in engine.analyze_batch(&subjects) {
        match outcome.outcome {
            Ok(result) => results.push(result),
            Err(e) => warn!("skipping {}: {}", outcome.subject_id, e),
        }
    }

    match out {
        Some(path) => {
            report::write_results_file(path, &results)?;
            info!(
                "analysis complete, {} rows written to {}",
                results.len(),
                path.display()
            );
        }
        None => report::write_results(io::stdout().lock(), &results)?,
    }
    Ok(())
}

fn cmd_psd(input: Option<&Path>, engine_args: &EngineArgs) -> Result<()> {
    let settings = load_settings(engine_args)?;
    let engine = build_engine(&settings)?;
    let series = read_series(input)?;
    let summary = engine
        .spectral_summary(&series)
        .map_err(|e| anyhow!("spectral analysis failed: {}", e))?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn cmd_rmssd(input: Option<&Path>) -> Result<()> {
    let series = read_series(input)?;
    let value = rmssd(&series)?;
    let out = RmssdOutput {
        n: series.len(),
        rmssd: value,
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}
