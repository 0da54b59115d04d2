//! Synthetic instance generation for local experimentation and tests
//! (spec.md §6 fixtures). Grounded on the teacher's own
//! `random_location_generator`/`generate_customer_demands` shape: a single
//! seeded `ChaCha8Rng` drives every random draw so a given seed always
//! reproduces the same instance.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::io::{DepotInput, PickupSiteInput, RoutingInput, VehicleInput};

/// Average vehicle travel speed used to derive `duration_matrix` from
/// `distance_matrix` (metres per minute; ~30 km/h).
const ASSUMED_SPEED_METRES_PER_MINUTE: f64 = 500.0;

/// Generate a synthetic routing instance: location 0 is the single depot,
/// locations `1..=num_sites` are pickup sites scattered on a square plane,
/// and the fleet is `num_vehicles` identically provisioned vehicles based
/// at that depot. No terminals are generated (callers can extend the
/// result if their scenario needs one).
pub fn generate_random_routing_input(
    num_sites: usize,
    num_vehicles: usize,
    seed: u64,
) -> RoutingInput {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let num_locations = num_sites + 1;
    let coords: Vec<(f64, f64)> = (0..num_locations)
        .map(|_| (rng.gen_range(0.0..10_000.0), rng.gen_range(0.0..10_000.0)))
        .collect();

    let mut distance_matrix = vec![vec![0.0; num_locations]; num_locations];
    let mut duration_matrix = vec![vec![0.0; num_locations]; num_locations];
    for (i, j) in itertools::iproduct!(0..num_locations, 0..num_locations) {
        if i == j {
            continue;
        }
        let (xi, yi) = coords[i];
        let (xj, yj) = coords[j];
        let dist = ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt();
        distance_matrix[i][j] = dist;
        duration_matrix[i][j] = dist / ASSUMED_SPEED_METRES_PER_MINUTE;
    }

    let pickup_sites: Vec<PickupSiteInput> = (1..num_locations)
        .map(|location_index| PickupSiteInput {
            capacity: rng.gen_range(500.0..2_000.0),
            level: rng.gen_range(0.0..500.0),
            growth_rate: rng.gen_range(1.0..20.0) / crate::config::MINUTES_PER_DAY,
            location_index,
        })
        .collect();

    let vehicles: Vec<VehicleInput> = (0..num_vehicles)
        .map(|_| VehicleInput {
            load_capacity: rng.gen_range(2_000.0..6_000.0),
            home_depot_index: 0,
            max_route_duration: rng.gen_range(360..600),
        })
        .collect();

    info!(
        num_sites,
        num_vehicles, seed, "generated synthetic routing instance"
    );

    RoutingInput {
        pickup_sites,
        depots: vec![DepotInput { location_index: 0 }],
        terminals: vec![],
        vehicles,
        distance_matrix,
        duration_matrix,
    }
}
