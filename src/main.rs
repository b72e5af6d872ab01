mod report;

use std::env;
use std::path::Path;

use data_engine::{sort_candles, DataEngine};
use tracing::{info, warn};

use crate::report::{IndicatorReport, RunConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut args = env::args().skip(1);
    let Some(csv_path) = args.next() else {
        eprintln!("usage: indicator_system <candles.csv> [run-config.json]");
        std::process::exit(2);
    };

    let config = match args.next() {
        Some(path) => RunConfig::from_file(Path::new(&path))?,
        None => RunConfig::default(),
    };

    let engine = DataEngine::new();
    let mut candles = engine.fetch_from_csv(Path::new(&csv_path))?;
    if candles.is_empty() {
        warn!(path = %csv_path, "no candles loaded");
    }
    sort_candles(&mut candles);

    let report = IndicatorReport::build(&candles, &config);
    info!(
        rsi = report.momentum.rsi.len(),
        renko_bricks = report.renko.bricks.len(),
        first_red_days = report.first_red_candle.levels.len(),
        range_days = report.range_breakout.levels.len(),
        "indicators computed"
    );

    if let Some(dir) = &config.csv_out {
        report.write_csv_files(dir)?;
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// Initialise an INFO `Subscriber` for `Tracing` logs, overridable with RUST_LOG
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .init()
}
