use std::env;
use std::error::Error;
use std::fs;

use colored::*;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use wasteroute::driver::{write_progress_csv, Driver, RunSchedule};
use wasteroute::io::{ProgressSample, RoutingInput};

const DEFAULT_INPUT_PATH: &str = "routing_input.json";
const DEFAULT_OUTPUT_PATH: &str = "routing_output.json";
const DEFAULT_PROGRESS_PATH: &str = "best_so_far.csv";
const DEFAULT_BASE_SEED: u64 = 67;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_span_events(fmt::format::FmtSpan::NEW | fmt::format::FmtSpan::CLOSE)
                .pretty(),
        )
        .init();

    let input_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_INPUT_PATH.to_string());
    info!(input_path, "reading routing input");
    let raw = fs::read_to_string(&input_path)?;
    let input: RoutingInput = serde_json::from_str(&raw)?;

    let worker_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let mut driver = Driver::new(input, worker_count, DEFAULT_BASE_SEED, None)?;

    let schedule = RunSchedule::default();
    let mut samples: Vec<ProgressSample> = Vec::new();
    let output = driver.run(&schedule, |sample| {
        info!(
            generation_index = sample.generation_index,
            best_cost = sample.best_cost,
            "progress"
        );
        samples.push(sample);
    });

    write_progress_csv(&samples, DEFAULT_PROGRESS_PATH)?;
    fs::write(DEFAULT_OUTPUT_PATH, serde_json::to_string_pretty(&output)?)?;

    println!(
        "{}",
        format!("Best cost: {:.4} -> {}", output.cost, DEFAULT_OUTPUT_PATH).green()
    );
    info!(cost = output.cost, output_path = DEFAULT_OUTPUT_PATH, "run complete");
    Ok(())
}
