//! Parallel steady-state genetic optimiser over permutation genomes
//! (spec.md §4.1, §5). Grounded on `examples/original_source/ga.h`'s
//! `Optimizer<T>`, restructured around `rayon` the way
//! `examples/khx02-vrp`'s `find_neighbours` uses `par_iter` for its own
//! (differently shaped) parallel scan.

mod crossover;

use std::sync::Mutex;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{MIN_POPULATION_SIZE, POPULATION_SIZE_GENE_MULTIPLIER};
use crate::model::Problem;
use crate::simulator::Simulator;

use crossover::order_crossover;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Explore,
    Greedy,
}

/// A genome together with its evaluated cost (spec.md §3).
#[derive(Debug, Clone)]
pub struct Proposal {
    pub genome: Vec<u32>,
    pub cost: f64,
}

impl Proposal {
    fn empty(num_genes: usize) -> Proposal {
        Proposal {
            genome: vec![0; num_genes],
            cost: f64::INFINITY,
        }
    }
}

pub struct Population {
    pub proposals: Vec<Proposal>,
    pub best_index: usize,
}

impl Population {
    fn size_for(num_genes: usize, worker_count: usize) -> usize {
        let requested = (POPULATION_SIZE_GENE_MULTIPLIER * num_genes).max(MIN_POPULATION_SIZE);
        let worker_count = worker_count.max(1);
        requested.div_ceil(worker_count) * worker_count
    }

    fn recompute_best(&mut self) {
        let mut best = 0;
        for j in 1..self.proposals.len() {
            if self.proposals[j].cost < self.proposals[best].cost {
                best = j;
            }
        }
        self.best_index = best;
    }
}

/// Per-worker resources pinned for the whole optimisation (spec.md §5, §9):
/// a distinct PRNG, a distinct `Simulator`, and a reusable `present` buffer.
/// Indexed by `rayon::current_thread_index()`; each slot is touched by
/// exactly one thread of `pool` at a time, so the `Mutex` is never
/// contended — it exists to avoid `unsafe` cells, not for real exclusion.
struct WorkerPool {
    pool: rayon::ThreadPool,
    rngs: Vec<Mutex<ChaCha8Rng>>,
    simulators: Vec<Mutex<Simulator>>,
    present_buffers: Vec<Mutex<Vec<bool>>>,
}

impl WorkerPool {
    fn new(worker_count: usize, base_seed: u64, problem: &Problem) -> WorkerPool {
        let worker_count = worker_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .build()
            .expect("failed to build worker thread pool");
        let rngs = (0..worker_count)
            .map(|w| Mutex::new(ChaCha8Rng::seed_from_u64(base_seed + 1 + w as u64)))
            .collect();
        let simulators = (0..worker_count)
            .map(|_| Mutex::new(Simulator::new(problem)))
            .collect();
        let present_buffers = (0..worker_count)
            .map(|_| Mutex::new(vec![false; problem.num_genes]))
            .collect();
        WorkerPool {
            pool,
            rngs,
            simulators,
            present_buffers,
        }
    }
}

/// Population of proposals, parallel child generation, per-slot elitist
/// replacement, and best-tracking (spec.md §4.1).
pub struct Optimizer {
    pub population: Population,
    children: Vec<Proposal>,
    main_rng: ChaCha8Rng,
    permutation_scratch: Vec<usize>,
    workers: WorkerPool,
}

impl Optimizer {
    /// Build the optimiser and run the sequential seed evaluation on
    /// worker 0, exactly as spec.md §4.1 "Initialisation" requires for
    /// determinism of the seed.
    pub fn new(
        problem: &Problem,
        worker_count: usize,
        base_seed: u64,
        seed_genome: Option<Vec<u32>>,
    ) -> Optimizer {
        // WorkerPool::new clamps independently; clamped here too so every
        // downstream use (population size, log fields) sees the same value.
        let worker_count = worker_count.max(1);
        let population_size = Population::size_for(problem.num_genes, worker_count);
        info!(
            population_size,
            num_genes = problem.num_genes,
            worker_count,
            "initialising population"
        );

        let mut main_rng = ChaCha8Rng::seed_from_u64(base_seed);
        let mut proposals: Vec<Proposal> = (0..population_size)
            .map(|_| Proposal::empty(problem.num_genes))
            .collect();

        for proposal in &mut proposals {
            for (i, gene) in proposal.genome.iter_mut().enumerate() {
                *gene = i as u32;
            }
            proposal.genome.shuffle(&mut main_rng);
        }
        if let Some(seed_genome) = seed_genome {
            debug_assert_eq!(seed_genome.len(), problem.num_genes);
            proposals[0].genome = seed_genome;
        }

        let workers = WorkerPool::new(worker_count, base_seed, problem);
        {
            let mut sim = workers.simulators[0].lock().unwrap();
            for proposal in &mut proposals {
                proposal.cost = sim.cost(&proposal.genome, problem, f64::INFINITY);
            }
        }

        let children: Vec<Proposal> = (0..population_size)
            .map(|_| Proposal::empty(problem.num_genes))
            .collect();
        let permutation_scratch: Vec<usize> = (0..population_size).collect();

        let mut population = Population {
            proposals,
            best_index: 0,
        };
        population.recompute_best();
        info!(best_cost = population.proposals[population.best_index].cost, "initial population evaluated");

        Optimizer {
            population,
            children,
            main_rng,
            permutation_scratch,
            workers,
        }
    }

    /// Advance the population by `generations` generations in `mode`
    /// (spec.md §4.1 "Per-generation step").
    pub fn optimise(&mut self, generations: usize, mode: Mode, problem: &Problem) {
        for generation in 0..generations {
            self.step(mode, problem);
            if generation % 1000 == 0 {
                debug!(
                    generation,
                    best_cost = self.population.proposals[self.population.best_index].cost,
                    "generation step"
                );
            }
        }
    }

    fn step(&mut self, mode: Mode, problem: &Problem) {
        let p = self.population.proposals.len();
        let best_index = self.population.best_index;

        match mode {
            Mode::Explore => {
                self.permutation_scratch.shuffle(&mut self.main_rng);
            }
            Mode::Greedy => {}
        }

        let population = &self.population;
        let permutation = &self.permutation_scratch;
        let workers = &self.workers;
        let children = &mut self.children;

        workers.pool.install(|| {
            children.par_iter_mut().enumerate().for_each(|(j, child)| {
                let worker = rayon::current_thread_index().unwrap_or(0);
                let partner = match mode {
                    Mode::Explore => permutation[j],
                    Mode::Greedy => best_index,
                };

                let parent_a = &population.proposals[j].genome;
                let parent_b = &population.proposals[partner].genome;

                {
                    let mut rng = workers.rngs[worker].lock().unwrap();
                    let mut present = workers.present_buffers[worker].lock().unwrap();
                    child.genome = order_crossover(parent_a, parent_b, &mut *rng, &mut *present);
                }

                child.cost = if is_noop_child(&child.genome, parent_a) {
                    f64::INFINITY
                } else {
                    let mut sim = workers.simulators[worker].lock().unwrap();
                    sim.cost(&child.genome, problem, population.proposals[j].cost)
                };
            });
        });

        for j in 0..p {
            if self.children[j].cost < self.population.proposals[j].cost {
                std::mem::swap(&mut self.population.proposals[j], &mut self.children[j]);
            }
        }
        self.population.recompute_best();
    }
}

/// The no-op filter (spec.md §4.1, law L3): a crossover child identical to
/// its own parent is never allowed to replace it, even at equal cost — it
/// carries no genetic change, so it is marked worse than anything.
fn is_noop_child(child_genome: &[u32], parent_genome: &[u32]) -> bool {
    child_genome == parent_genome
}
