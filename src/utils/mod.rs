pub mod constants;
pub mod coordinates;
pub mod dates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{named_region, validate_coordinates, BoundingBox};
pub use dates::{parse_date_bound, parse_launch_date};
pub use filename::generate_default_results_filename;
pub use progress::ProgressReporter;
