//! Genome -> per-vehicle route decoder (spec.md §4.3).

use crate::model::{LocationId, Problem};

/// Decode one `(day, *)` slice of the genome, advancing `cursor` past every
/// gene consumed (site genes plus the trailing break marker, per vehicle).
///
/// Returns each vehicle's route (home depot at both ends, or empty if the
/// vehicle never left its depot) and the total hop distance decoded for the
/// day, used for the early-out lower bound.
pub fn decode_day(
    genome: &[u32],
    cursor: &mut usize,
    problem: &Problem,
) -> (Vec<Vec<LocationId>>, f64) {
    let mut day_routes = Vec::with_capacity(problem.vehicles.len());
    let mut day_distance = 0.0;

    for vehicle in &problem.vehicles {
        let depot_loc = problem.depots[vehicle.home_depot_index].location_id;
        let mut route = vec![depot_loc];
        let mut prev = depot_loc;

        while *cursor < problem.num_genes
            && (genome[*cursor] as usize) < problem.num_site_genes
        {
            let site_gene = genome[*cursor] as usize;
            let site = problem.gene_to_site[site_gene];
            let loc = problem.sites[site].location_id;
            if prev != loc {
                day_distance += problem.distance_matrix[prev][loc];
                route.push(loc);
                prev = loc;
            }
            *cursor += 1;
        }

        // Consume the break marker closing this (day, vehicle) slot.
        if *cursor < problem.num_genes {
            *cursor += 1;
        }

        if route.len() == 1 {
            route.clear();
        } else {
            day_distance += problem.distance_matrix[prev][depot_loc];
            route.push(depot_loc);
        }

        day_routes.push(route);
    }

    (day_routes, day_distance)
}
