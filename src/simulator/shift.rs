//! The cooperative shift process (spec.md §4.4.1, §4.4.2): one vehicle's
//! continuous route for a single day, advanced through `{Travel, Service,
//! NextStep, Done}` by the day's `Clock` rather than a stackful coroutine.

use crate::clock::Clock;
use crate::config::PICKUP_DURATION_MINUTES;
use crate::model::{LocationId, LocationKind, Problem};

#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleState {
    pub load: f64,
    pub odometer: f64,
    pub overtime: f64,
}

impl VehicleState {
    pub fn reset(&mut self) {
        *self = VehicleState::default();
    }
}

/// Pickup semantics (spec.md §4.4.2): mutates vehicle load and site level.
fn pickup(load: &mut f64, capacity: f64, level: &mut f64) {
    if *level == 0.0 || *load == capacity {
        return;
    }
    if *load + *level > capacity {
        *level -= capacity - *load;
        *load = capacity;
    } else {
        *load += *level;
        *level = 0.0;
    }
}

/// Cursor through one vehicle's route for the day; resumed by the clock at
/// each arrival instant.
struct ShiftCursor {
    route: Vec<LocationId>,
    next_index: usize,
    shift_start: f64,
}

/// Run every vehicle's shift process for one day concurrently, in the
/// sense that all are interleaved on a single `Clock` and arrivals at a
/// shared site commute deterministically by simulated time (day-major,
/// vehicle-minor spawn order as the tie-break).
pub fn simulate_day(
    day_routes: &[Vec<LocationId>],
    problem: &Problem,
    vehicle_states: &mut [VehicleState],
    site_levels: &mut [f64],
) {
    let mut clock = Clock::new();
    let mut cursors: Vec<Option<ShiftCursor>> = Vec::with_capacity(day_routes.len());

    for (v, route) in day_routes.iter().enumerate() {
        if route.len() > 1 {
            let cur = route[0];
            let next = route[1];
            let dur = problem.duration_matrix[cur][next];
            vehicle_states[v].odometer += problem.distance_matrix[cur][next];
            clock.schedule(dur, v);
            cursors.push(Some(ShiftCursor {
                route: route.clone(),
                next_index: 1,
                shift_start: 0.0,
            }));
        } else {
            cursors.push(None);
        }
    }

    while let Some((time, v)) = clock.pop_next() {
        let cursor = cursors[v]
            .as_mut()
            .expect("clock only schedules vehicles with an active shift cursor");
        let loc = cursor.route[cursor.next_index];

        match problem.location_table[loc].kind {
            LocationKind::Site => {
                let site = problem.location_table[loc].type_local_index;
                pickup(
                    &mut vehicle_states[v].load,
                    problem.vehicles[v].load_capacity,
                    &mut site_levels[site],
                );
            }
            LocationKind::Depot => {
                vehicle_states[v].load = 0.0;
            }
            LocationKind::Terminal => {}
        }

        let service = match problem.location_table[loc].kind {
            LocationKind::Site => PICKUP_DURATION_MINUTES,
            _ => 0.0,
        };
        let ready_at = time + service;

        if cursor.next_index + 1 < cursor.route.len() {
            let next = cursor.route[cursor.next_index + 1];
            let dur = problem.duration_matrix[loc][next];
            vehicle_states[v].odometer += problem.distance_matrix[loc][next];
            cursor.next_index += 1;
            clock.schedule(ready_at + dur, v);
        } else {
            let shift_duration = ready_at - cursor.shift_start;
            let max_shift = problem.vehicles[v].max_shift_minutes;
            if shift_duration > max_shift {
                vehicle_states[v].overtime += shift_duration - max_shift;
            }
        }
    }
}
