use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tween_engine::{
    load_folder, parse_overrides, BatchConfig, BatchReport, BatchRunner, ExposureMatchTable,
};

#[derive(Parser)]
#[command(name = "xmp-tween")]
#[command(about = "Blend Lightroom develop settings across a timelapse and smooth its exposure")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpolate, smooth and override the sidecars in a folder
    Tween {
        /// Folder containing the .xmp sidecars
        #[arg(short, long)]
        path: PathBuf,

        /// Write results here instead of back into the source folder
        #[arg(short, long)]
        destination: Option<PathBuf>,

        /// Interpolate settings between edited frames
        #[arg(short, long)]
        tween: bool,

        /// Smooth exposure over a window of this many seconds on either side
        #[arg(short = 'x', long)]
        exposure_smoothing: Option<f64>,

        /// SETTING VALUE pairs applied to every frame afterwards
        #[arg(short = 'v', long = "var", num_args = 1.., allow_negative_numbers = true, action = ArgAction::Append)]
        vars: Vec<String>,

        /// JSON batch config; command line flags take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a JSON report of the batch
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Tabulate exposure edits per aperture and shutter speed
    MatchTable {
        /// Folder containing the .xmp sidecars
        #[arg(short, long)]
        path: PathBuf,

        /// Also write the table as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tween {
            path,
            destination,
            tween,
            exposure_smoothing,
            vars,
            config,
            report,
        } => {
            let config = build_config(config.as_deref(), tween, exposure_smoothing, &vars)?;
            run_batch(&path, destination.as_deref(), config, report.as_deref())
        }
        Commands::MatchTable { path, output } => match_table(&path, output.as_deref()),
    }
}

/// Merge the optional config file with command line flags.
fn build_config(
    config_path: Option<&Path>,
    tween: bool,
    exposure_smoothing: Option<f64>,
    vars: &[String],
) -> Result<BatchConfig> {
    let mut config = match config_path {
        Some(path) => BatchConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => BatchConfig::default(),
    };

    config.tween |= tween;
    if exposure_smoothing.is_some() {
        config.exposure_smoothing = exposure_smoothing;
    }
    // Appended so command line values are applied last
    config
        .overrides
        .extend(parse_overrides(vars).context("Invalid --var list")?);

    Ok(config)
}

fn run_batch(source: &Path, destination: Option<&Path>, config: BatchConfig, report_path: Option<&Path>) -> Result<()> {
    println!("🔍 Processing sidecars in: {}", source.display());

    let runner = BatchRunner::new(config).context("Invalid batch configuration")?;
    let report = runner
        .run_folder(source, destination)
        .with_context(|| format!("Failed to process {}", source.display()))?;

    print_report(&report, destination.unwrap_or(source));

    if let Some(report_path) = report_path {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize batch report to JSON")?;
        std::fs::write(report_path, json)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        println!("💾 Report saved to: {}", report_path.display());
    }

    Ok(())
}

fn print_report(report: &BatchReport, destination: &Path) {
    if report.record_count == 0 {
        println!("⚠️  No sidecar files found");
        return;
    }

    println!("\n📈 BATCH RESULTS");
    println!("================");
    println!("Records: {}", report.record_count);
    println!("Tweenpoints: {:?}", report.tweenpoints.indices());
    println!("Tweened: {}", report.tweened);
    for stage in &report.stages {
        println!("  ✅ {:?}", stage);
    }
    println!("📸 Wrote {} sidecars to {}", report.written.len(), destination.display());
}

fn match_table(source: &Path, output: Option<&Path>) -> Result<()> {
    println!("🔍 Reading sidecars in: {}", source.display());

    let records = load_folder(source).with_context(|| format!("Failed to load {}", source.display()))?;
    let table = ExposureMatchTable::build(&records).context("Failed to build exposure match table")?;

    if table.is_empty() {
        println!("⚠️  No sidecar files found");
        return Ok(());
    }

    println!("\n📊 EXPOSURE MATCH TABLE");
    println!("======================");
    print!("{}", table.render_text());

    if let Some(output) = output {
        let json = serde_json::to_string_pretty(&table).context("Failed to serialize match table to JSON")?;
        std::fs::write(output, json).with_context(|| format!("Failed to write table to {}", output.display()))?;
        println!("💾 Table saved to: {}", output.display());
    }

    Ok(())
}
