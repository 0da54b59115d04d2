//! Driver (spec.md §2, §4.6): wires raw input to the Problem Model, owns
//! the `Optimizer`, and serialises the best genome's decoded routes back
//! out. Shaped after `examples/khx02-vrp/src/main.rs`'s span-wrapped setup
//! / search-loop / final-report structure, without that file's
//! tabu-search-specific bookkeeping.

use csv::Writer;
use std::error::Error;
use std::path::Path;
use tracing::{info, span, Level};

use crate::config::{DEFAULT_EXPLORE_GENERATIONS, DEFAULT_GREEDY_GENERATIONS, DEFAULT_SAMPLE_EVERY};
use crate::error::ConfigError;
use crate::io::{ProgressSample, RoutingInput, RoutingOutput};
use crate::model::Problem;
use crate::optimizer::{Mode, Optimizer};
use crate::simulator::Simulator;

pub struct RunSchedule {
    pub explore_generations: usize,
    pub greedy_generations: usize,
    pub sample_every: usize,
}

impl Default for RunSchedule {
    fn default() -> Self {
        RunSchedule {
            explore_generations: DEFAULT_EXPLORE_GENERATIONS,
            greedy_generations: DEFAULT_GREEDY_GENERATIONS,
            sample_every: DEFAULT_SAMPLE_EVERY,
        }
    }
}

pub struct Driver {
    problem: Problem,
    optimizer: Optimizer,
}

impl Driver {
    pub fn new(
        input: RoutingInput,
        worker_count: usize,
        base_seed: u64,
        seed_genome: Option<Vec<u32>>,
    ) -> Result<Driver, ConfigError> {
        let span = span!(Level::INFO, "setup");
        let _guard = span.enter();

        let problem = Problem::from_input(input)?;
        let optimizer = Optimizer::new(&problem, worker_count.max(1), base_seed, seed_genome);

        Ok(Driver { problem, optimizer })
    }

    /// Run the two-phase schedule, emitting a `(generation_index,
    /// best_cost)` record to `on_sample` every `schedule.sample_every`
    /// generations, then decode the best genome once and return it.
    pub fn run(
        &mut self,
        schedule: &RunSchedule,
        mut on_sample: impl FnMut(ProgressSample),
    ) -> RoutingOutput {
        let loop_span = span!(
            Level::INFO,
            "main_search_loop",
            explore = schedule.explore_generations,
            greedy = schedule.greedy_generations
        );
        let _loop_guard = loop_span.enter();

        self.run_phase(Mode::Explore, schedule.explore_generations, schedule.sample_every, &mut on_sample);
        self.run_phase(Mode::Greedy, schedule.greedy_generations, schedule.sample_every, &mut on_sample);

        let best = &self.optimizer.population.proposals[self.optimizer.population.best_index];
        let routes = Simulator::decode_routes(&best.genome, &self.problem);
        let cost = best.cost;

        info!(cost, "optimisation complete");
        RoutingOutput { routes, cost }
    }

    fn run_phase(
        &mut self,
        mode: Mode,
        generations: usize,
        sample_every: usize,
        on_sample: &mut impl FnMut(ProgressSample),
    ) {
        if generations == 0 || sample_every == 0 {
            self.optimizer.optimise(generations, mode, &self.problem);
            return;
        }
        let mut remaining = generations;
        let mut generation_index = 0;
        while remaining > 0 {
            let chunk = sample_every.min(remaining);
            self.optimizer.optimise(chunk, mode, &self.problem);
            generation_index += chunk;
            remaining -= chunk;
            let best_cost = self.optimizer.population.proposals[self.optimizer.population.best_index].cost;
            on_sample(ProgressSample {
                generation_index,
                best_cost,
            });
        }
    }
}

/// Write the diagnostic `(generation_index, best_cost)` stream to a CSV
/// file, the same crate and shape as `examples/khx02-vrp`'s
/// `save_to_csv`.
pub fn write_progress_csv(
    samples: &[ProgressSample],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["generation_index", "best_cost"])?;
    for sample in samples {
        writer.write_record([
            sample.generation_index.to_string(),
            sample.best_cost.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
