use serde::Deserialize;

use crate::constants::STANDARD_GRAVITY;
use crate::sensor::{SensorKind, SensorSample};
use crate::signal_processing::Vector3;

/// Local geomagnetic field in µT
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Horizontal component pointing at magnetic north
    pub horizontal_ut: f32,
    /// Vertical component, positive downward (northern hemisphere)
    pub vertical_ut: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            horizontal_ut: 22.0,
            vertical_ut: 40.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Per-sensor sample rate in Hz
    pub sample_rate_hz: f32,
    pub duration_secs: f32,
    pub field: FieldConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100.0,
            duration_secs: 5.0,
            field: FieldConfig::default(),
        }
    }
}

/// Gravity and field readings of a device lying face-up whose top edge
/// points `heading_degrees` clockwise from magnetic north
pub fn flat_device_vectors(heading_degrees: f32, field: &FieldConfig) -> (Vector3, Vector3) {
    let psi = heading_degrees.to_radians();
    let gravity = Vector3::new(0.0, 0.0, STANDARD_GRAVITY);
    let magnetic = Vector3::new(
        -field.horizontal_ut * psi.sin(),
        field.horizontal_ut * psi.cos(),
        -field.vertical_ut,
    );
    (gravity, magnetic)
}

/// Interleaved accelerometer and magnetometer samples for a flat device
/// turning along `heading_fn(t_secs)`.
///
/// Magnetometer readings are offset by half a sample period from the
/// accelerometer, as independent sensors would be.
pub fn generate_samples<F>(config: &MotionConfig, heading_fn: F) -> Vec<SensorSample>
where
    F: Fn(f32) -> f32,
{
    let count = (config.duration_secs * config.sample_rate_hz).max(0.0) as usize;
    let period_ns = (1e9 / config.sample_rate_hz as f64) as u64;
    let mut samples = Vec::with_capacity(count * 2);

    for n in 0..count {
        let accel_ts = n as u64 * period_ns;
        let mag_ts = accel_ts + period_ns / 2;

        let (gravity, _) = flat_device_vectors(heading_fn(accel_ts as f32 * 1e-9), &config.field);
        let (_, magnetic) = flat_device_vectors(heading_fn(mag_ts as f32 * 1e-9), &config.field);

        samples.push(SensorSample::new(SensorKind::Accelerometer, accel_ts, gravity));
        samples.push(SensorSample::new(SensorKind::Magnetometer, mag_ts, magnetic));
    }

    samples
}
