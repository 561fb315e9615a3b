mod measure;
mod motion;
mod noise;

pub use measure::{angle_error, replay_through_estimator};
pub use motion::{FieldConfig, MotionConfig, flat_device_vectors, generate_samples};
pub use noise::{NoiseConfig, apply_noise};
