//! Immutable Problem Model: sites, depots, terminals, vehicles, the road
//! network, and the derived genome layout (spec.md §3).

use tracing::{debug, info};

use crate::config::{HORIZON_DAYS, MINUTES_PER_DAY, SITE_CAPACITY_SAFETY_FACTOR};
use crate::error::ConfigError;
use crate::io::RoutingInput;

pub type LocationId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Depot,
    Site,
    Terminal,
}

#[derive(Debug, Clone, Copy)]
pub struct LocationEntry {
    pub kind: LocationKind,
    pub type_local_index: usize,
}

#[derive(Debug, Clone)]
pub struct Site {
    pub capacity: f64,
    pub initial_level: f64,
    pub growth_rate: f64,
    pub location_id: LocationId,
    pub max_visits: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Depot {
    pub location_id: LocationId,
}

#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    pub location_id: LocationId,
}

#[derive(Debug, Clone, Copy)]
pub struct Vehicle {
    pub load_capacity: f64,
    pub home_depot_index: usize,
    pub max_shift_minutes: f64,
}

/// Immutable, shared read-only description of one routing problem.
#[derive(Debug, Clone)]
pub struct Problem {
    pub sites: Vec<Site>,
    pub depots: Vec<Depot>,
    pub terminals: Vec<Terminal>,
    pub vehicles: Vec<Vehicle>,
    pub distance_matrix: Vec<Vec<f64>>,
    pub duration_matrix: Vec<Vec<f64>>,
    pub horizon_days: usize,
    /// Indexed by `location_id`.
    pub location_table: Vec<LocationEntry>,
    /// For gene index `i < num_site_genes`, `gene_to_site[i]` is the site index.
    pub gene_to_site: Vec<usize>,
    pub num_site_genes: usize,
    pub num_break_genes: usize,
    pub num_genes: usize,
}

impl Problem {
    /// Build and validate a Problem Model from raw input. Rejects
    /// configuration-invalid inputs per spec.md §7(1).
    pub fn from_input(input: RoutingInput) -> Result<Problem, ConfigError> {
        if input.vehicles.is_empty() {
            return Err(ConfigError::EmptyFleet);
        }
        if input.pickup_sites.is_empty() {
            return Err(ConfigError::EmptySites);
        }
        if input.depots.is_empty() {
            return Err(ConfigError::EmptyDepots);
        }

        let n_dist = input.distance_matrix.len();
        let n_dur = input.duration_matrix.len();
        if n_dist != n_dur {
            return Err(ConfigError::MatrixMismatch {
                distance: n_dist,
                duration: n_dur,
            });
        }
        for row in &input.distance_matrix {
            if row.len() != n_dist {
                return Err(ConfigError::MatrixDimension {
                    expected: n_dist,
                    actual: row.len(),
                });
            }
        }
        for row in &input.duration_matrix {
            if row.len() != n_dur {
                return Err(ConfigError::MatrixDimension {
                    expected: n_dur,
                    actual: row.len(),
                });
            }
        }

        let max_location_index = input
            .pickup_sites
            .iter()
            .map(|s| s.location_index)
            .chain(input.depots.iter().map(|d| d.location_index))
            .chain(input.terminals.iter().map(|t| t.location_index))
            .max()
            .unwrap_or(0);
        if max_location_index >= n_dist {
            return Err(ConfigError::LocationOutOfRange {
                location_index: max_location_index,
                matrix_size: n_dist,
            });
        }

        let mut seen_location_indices = vec![false; n_dist];
        for location_index in input
            .pickup_sites
            .iter()
            .map(|s| s.location_index)
            .chain(input.depots.iter().map(|d| d.location_index))
            .chain(input.terminals.iter().map(|t| t.location_index))
        {
            if seen_location_indices[location_index] {
                return Err(ConfigError::DuplicateLocationIndex { location_index });
            }
            seen_location_indices[location_index] = true;
        }

        for (i, v) in input.vehicles.iter().enumerate() {
            if v.max_route_duration <= 0 {
                return Err(ConfigError::NonPositiveShift { vehicle_index: i });
            }
            if v.load_capacity <= 0.0 {
                return Err(ConfigError::NonPositiveCapacity { vehicle_index: i });
            }
            if v.home_depot_index >= input.depots.len() {
                return Err(ConfigError::HomeDepotOutOfRange {
                    vehicle_index: i,
                    home_depot_index: v.home_depot_index,
                    depot_count: input.depots.len(),
                });
            }
        }

        for (i, s) in input.pickup_sites.iter().enumerate() {
            if s.level < 0.0 || s.growth_rate < 0.0 {
                return Err(ConfigError::NegativeSiteField { site_index: i });
            }
            // A non-positive capacity makes max_visits below blow up towards
            // the f64::EPSILON floor instead of describing a real site.
            if s.capacity <= 0.0 {
                return Err(ConfigError::NonPositiveSiteCapacity { site_index: i });
            }
        }

        let horizon_minutes = HORIZON_DAYS as f64 * MINUTES_PER_DAY;

        let sites: Vec<Site> = input
            .pickup_sites
            .iter()
            .map(|s| {
                let denom = (s.capacity * SITE_CAPACITY_SAFETY_FACTOR).max(f64::EPSILON);
                let max_visits =
                    ((s.growth_rate * horizon_minutes + s.level) / denom).ceil().max(1.0) as usize;
                Site {
                    capacity: s.capacity,
                    initial_level: s.level,
                    growth_rate: s.growth_rate,
                    location_id: s.location_index,
                    max_visits,
                }
            })
            .collect();

        let depots: Vec<Depot> = input
            .depots
            .iter()
            .map(|d| Depot {
                location_id: d.location_index,
            })
            .collect();

        let terminals: Vec<Terminal> = input
            .terminals
            .iter()
            .map(|t| Terminal {
                location_id: t.location_index,
            })
            .collect();

        let vehicles: Vec<Vehicle> = input
            .vehicles
            .iter()
            .map(|v| Vehicle {
                load_capacity: v.load_capacity,
                home_depot_index: v.home_depot_index,
                max_shift_minutes: v.max_route_duration as f64,
            })
            .collect();

        // Each location_id is assigned to exactly one of depots/sites/
        // terminals (checked above), so these three loops never overwrite
        // one another's entries.
        let mut location_table = vec![
            LocationEntry {
                kind: LocationKind::Site,
                type_local_index: 0,
            };
            n_dist
        ];
        for (i, d) in depots.iter().enumerate() {
            location_table[d.location_id] = LocationEntry {
                kind: LocationKind::Depot,
                type_local_index: i,
            };
        }
        for (i, s) in sites.iter().enumerate() {
            location_table[s.location_id] = LocationEntry {
                kind: LocationKind::Site,
                type_local_index: i,
            };
        }
        for (i, t) in terminals.iter().enumerate() {
            location_table[t.location_id] = LocationEntry {
                kind: LocationKind::Terminal,
                type_local_index: i,
            };
        }

        let mut gene_to_site = Vec::new();
        for (i, s) in sites.iter().enumerate() {
            gene_to_site.extend(std::iter::repeat(i).take(s.max_visits));
        }

        let num_site_genes = gene_to_site.len();
        let num_break_genes = HORIZON_DAYS * vehicles.len();
        let num_genes = num_site_genes + num_break_genes;

        debug!(
            num_site_genes,
            num_break_genes, num_genes, "derived genome layout"
        );
        info!(
            sites = sites.len(),
            depots = depots.len(),
            terminals = terminals.len(),
            vehicles = vehicles.len(),
            "problem model constructed"
        );

        Ok(Problem {
            sites,
            depots,
            terminals,
            vehicles,
            distance_matrix: input.distance_matrix,
            duration_matrix: input.duration_matrix,
            horizon_days: HORIZON_DAYS,
            location_table,
            gene_to_site,
            num_site_genes,
            num_break_genes,
            num_genes,
        })
    }
}
