use thiserror::Error;

/// Configuration-invalid errors, rejected at `Problem` construction time.
///
/// Per spec: invalid inputs never surface mid-optimisation — they are
/// caught here, before a single generation runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fleet is empty: at least one vehicle is required")]
    EmptyFleet,

    #[error("no pickup sites supplied")]
    EmptySites,

    #[error("no depots supplied")]
    EmptyDepots,

    #[error(
        "distance/duration matrix dimension mismatch: expected at least {expected}x{expected}, got {actual}x{actual}"
    )]
    MatrixDimension { expected: usize, actual: usize },

    #[error("distance and duration matrices have different dimensions ({distance} vs {duration})")]
    MatrixMismatch { distance: usize, duration: usize },

    #[error("vehicle {vehicle_index} has non-positive max_shift_minutes")]
    NonPositiveShift { vehicle_index: usize },

    #[error("vehicle {vehicle_index} has non-positive load_capacity")]
    NonPositiveCapacity { vehicle_index: usize },

    #[error("site {site_index} has negative level or growth_rate")]
    NegativeSiteField { site_index: usize },

    #[error("site {site_index} has non-positive capacity")]
    NonPositiveSiteCapacity { site_index: usize },

    #[error("location_index {location_index} out of range for a {matrix_size}x{matrix_size} matrix")]
    LocationOutOfRange {
        location_index: usize,
        matrix_size: usize,
    },

    #[error("vehicle {vehicle_index} has home_depot_index {home_depot_index}, but only {depot_count} depots are supplied")]
    HomeDepotOutOfRange {
        vehicle_index: usize,
        home_depot_index: usize,
        depot_count: usize,
    },

    #[error("location_index {location_index} is assigned to more than one of depots, pickup sites, or terminals")]
    DuplicateLocationIndex { location_index: usize },
}
