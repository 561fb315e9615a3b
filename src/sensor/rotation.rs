use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use super::RotationProvider;
use crate::config::DeviceRotation;

/// Rotation that never changes
#[derive(Debug, Clone, Copy)]
pub struct FixedRotation(pub DeviceRotation);

impl RotationProvider for FixedRotation {
    fn current_rotation(&self) -> Option<DeviceRotation> {
        Some(self.0)
    }
}

/// Rotation pushed by the display layer whenever the screen turns
///
/// Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct SharedRotation {
    degrees: Arc<AtomicU16>,
}

impl SharedRotation {
    pub fn new(rotation: DeviceRotation) -> Self {
        Self {
            degrees: Arc::new(AtomicU16::new(rotation.offset_degrees())),
        }
    }

    pub fn set(&self, rotation: DeviceRotation) {
        self.degrees
            .store(rotation.offset_degrees(), Ordering::Release);
    }
}

impl RotationProvider for SharedRotation {
    fn current_rotation(&self) -> Option<DeviceRotation> {
        DeviceRotation::from_degrees(self.degrees.load(Ordering::Acquire))
    }
}
