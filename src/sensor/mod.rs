//! Boundary between the heading pipeline and the platform.
//!
//! A [`SensorSource`] delivers raw accelerometer and magnetometer samples to
//! a [`SensorListener`], possibly from several threads at once. A
//! [`RotationProvider`] reports the current screen rotation and a
//! [`HeadingSink`] receives the resulting heading events.

pub mod replay;
pub mod rotation;

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use crate::config::{DeviceRotation, SamplingRate};
use crate::error::Result;
use crate::heading::HeadingEvent;
use crate::signal_processing::Vector3;

pub use replay::{ReplaySource, read_recording, select_samples, write_recording};
pub use rotation::{FixedRotation, SharedRotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Accelerometer,
    Magnetometer,
}

impl SensorKind {
    pub const ALL: [SensorKind; 2] = [SensorKind::Accelerometer, SensorKind::Magnetometer];
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accelerometer => write!(f, "accelerometer"),
            Self::Magnetometer => write!(f, "magnetometer"),
        }
    }
}

/// One timestamped three-axis reading
///
/// Accelerometer values are in m/s², magnetometer values in µT, both in the
/// device frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    #[serde(rename = "sensor")]
    pub kind: SensorKind,
    pub timestamp_ns: u64,
    pub values: Vector3,
}

impl SensorSample {
    pub fn new(kind: SensorKind, timestamp_ns: u64, values: Vector3) -> Self {
        Self {
            kind,
            timestamp_ns,
            values,
        }
    }
}

pub trait SensorListener: Send + Sync {
    fn on_sample(&self, sample: SensorSample);
}

pub trait SensorSource: Send {
    /// Whether the platform has a sensor of this kind
    fn has_sensor(&self, kind: SensorKind) -> Result<bool>;

    /// Start delivering samples of `kind` to `listener` at roughly `rate`
    fn register(
        &mut self,
        kind: SensorKind,
        rate: SamplingRate,
        listener: Arc<dyn SensorListener>,
    ) -> Result<()>;

    /// Stop all deliveries. Returns once no listener call is in progress.
    fn unregister_all(&mut self);
}

pub trait RotationProvider: Send + Sync {
    /// Current screen rotation, or `None` when no display is available
    fn current_rotation(&self) -> Option<DeviceRotation>;
}

pub trait HeadingSink: Send + Sync {
    fn heading_updated(&self, event: HeadingEvent);
}

impl HeadingSink for Sender<HeadingEvent> {
    fn heading_updated(&self, event: HeadingEvent) {
        if self.send(event).is_err() {
            log::warn!("Heading receiver dropped");
        }
    }
}
