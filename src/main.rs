use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tscast::aggregate::Frequency;
use tscast::core::ForecastFrame;
use tscast::ingest::DataTable;
use tscast::pipeline::{run, RunConfig, DEFAULT_CONFIDENCE, DEFAULT_HORIZON};
use tscast::report;
use tscast::Result;

/// Forecast a time series from a CSV file.
#[derive(Parser, Debug)]
#[command(name = "tscast", version, about)]
struct Cli {
    /// Input CSV file.
    input: PathBuf,

    /// Name of the column holding dates (day-first formats accepted).
    #[arg(long)]
    date_column: String,

    /// Name of the column holding the values to forecast.
    #[arg(long)]
    value_column: String,

    /// Aggregation frequency: daily, weekly, monthly, quarterly or yearly.
    #[arg(long, default_value_t = Frequency::Daily)]
    frequency: Frequency,

    /// Number of future buckets to forecast (1 to 365).
    #[arg(long, default_value_t = DEFAULT_HORIZON)]
    horizon: usize,

    /// Coverage of the uncertainty band, strictly between 0 and 1.
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Where to write the HTML report.
    #[arg(long, default_value = "forecast.html")]
    output: PathBuf,

    /// Also export the forecast rows as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Suppress the forecast table on stdout.
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = execute(&cli) {
        eprintln!("Error: {e}");
        exit(1);
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let table = DataTable::from_path(&cli.input)?;
    info!(path = %cli.input.display(), rows = table.len(), "loaded table");

    let config = RunConfig::new(&cli.date_column, &cli.value_column)
        .with_frequency(cli.frequency)
        .with_horizon(cli.horizon)
        .with_confidence(cli.confidence);

    let frame = run(&table, &config)?;

    report::write_html(&frame, &config, &cli.output)?;

    if let Some(json_path) = &cli.json {
        let json = serde_json::to_string_pretty(frame.rows())
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(json_path, json)?;
        info!(path = %json_path.display(), "wrote JSON export");
    }

    if !cli.quiet {
        print_tail(&frame);
        println!("\nReport written to {}", cli.output.display());
    }

    Ok(())
}

/// Print the last `horizon` rows as a plain-text table.
fn print_tail(frame: &ForecastFrame) {
    println!(
        "{:<12} {:>14} {:>14} {:>14}",
        "date", "point", "lower", "upper"
    );
    for row in frame.tail(frame.horizon()) {
        println!(
            "{:<12} {:>14.2} {:>14.2} {:>14.2}",
            row.date.to_string(),
            row.point,
            row.lower,
            row.upper
        );
    }
}
