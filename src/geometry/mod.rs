pub mod hit_testing;

pub use hit_testing::{calculate_bounds, distance, distance_to_line_segment, distance_to_polyline};
