//! Constants locked by the specification (spec.md §6).

/// Fixed planning horizon.
pub const HORIZON_DAYS: usize = 14;

/// Minutes a shift must pause at a site to complete a pickup.
pub const PICKUP_DURATION_MINUTES: f64 = 15.0;

/// Minutes in a simulated day.
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Safety factor applied when computing a site's max visit count.
pub const SITE_CAPACITY_SAFETY_FACTOR: f64 = 0.8;

/// Fuel cost: 2 €/L at 50 L per 100 000 m (100 km).
pub const FUEL_COST_PER_METRE: f64 = 50.0 / 100_000.0 * 2.0;

/// Euros charged per (day, site) pair left overloaded after growth.
pub const OVERLOAD_COST_PER_DAY: f64 = 50.0;

/// Euros per hour of overtime, expressed per minute.
pub const OVERTIME_COST_PER_MINUTE: f64 = 50.0 / 60.0;

/// Minimum population size regardless of genome length.
pub const MIN_POPULATION_SIZE: usize = 100;

/// Population size multiplier applied to `num_genes`.
pub const POPULATION_SIZE_GENE_MULTIPLIER: usize = 4;

/// Default batch-driver generation schedule (defaults, not contracts).
pub const DEFAULT_EXPLORE_GENERATIONS: usize = 40_000;
pub const DEFAULT_GREEDY_GENERATIONS: usize = 20_000;
pub const DEFAULT_SAMPLE_EVERY: usize = 100;
