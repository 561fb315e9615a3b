pub mod config;
pub mod constants;
pub mod error;
pub mod heading;
pub mod orientation;
pub mod output;
pub mod processing;
pub mod sensor;
pub mod signal_processing;

#[cfg(feature = "simulation")]
pub mod simulation;

pub use config::{DeviceRotation, HeadingConfig, SamplingRate};
pub use error::{HeadingError, Result};
pub use heading::{HeadingEstimator, HeadingEvent};
pub use processing::CompassHeading;
