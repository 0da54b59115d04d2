//! External interfaces (spec.md §6): JSON input/output boundary. Field
//! names are locked to `examples/original_source/routing_optimizer.cpp`'s
//! `from_json` structs so an existing `routing_input.json` parses unchanged.

use serde::{Deserialize, Serialize};

use crate::model::LocationId;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PickupSiteInput {
    pub capacity: f64,
    pub level: f64,
    pub growth_rate: f64,
    pub location_index: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DepotInput {
    pub location_index: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TerminalInput {
    pub location_index: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleInput {
    pub load_capacity: f64,
    pub home_depot_index: usize,
    pub max_route_duration: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingInput {
    pub pickup_sites: Vec<PickupSiteInput>,
    pub depots: Vec<DepotInput>,
    pub terminals: Vec<TerminalInput>,
    pub vehicles: Vec<VehicleInput>,
    pub distance_matrix: Vec<Vec<f64>>,
    pub duration_matrix: Vec<Vec<f64>>,
}

/// One day's routes for one vehicle, in visiting order. Empty if the
/// vehicle never left its depot that day.
pub type Route = Vec<LocationId>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingOutput {
    /// `routes[day][vehicle]`.
    pub routes: Vec<Vec<Route>>,
    pub cost: f64,
}

/// One `(generation_index, best_cost)` sample of the diagnostic stream.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressSample {
    pub generation_index: usize,
    pub best_cost: f64,
}
