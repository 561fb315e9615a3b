pub mod math;
pub mod smoothing;
pub mod vector;

pub use math::{degrees_delta, normalize_degrees, radians_to_heading};
pub use smoothing::ExponentialSmoother;
pub use vector::Vector3;
