use crate::config::{DeviceRotation, HeadingConfig, OrientationLimits};
use crate::orientation::{
    InclinationMatrix, Orientation, RotationMatrix, compensate_heading,
    rotation_matrix_from_vectors,
};
use crate::signal_processing::{ExponentialSmoother, Vector3, degrees_delta, radians_to_heading};

use super::HeadingEvent;

/// Outcome of one successful recompute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingUpdate {
    /// Euler angles derived from the current rotation matrix
    pub orientation: Orientation,
    /// Sensor-frame heading in whole degrees
    pub raw_heading: u16,
    /// Screen-frame heading after rotation compensation
    pub heading: u16,
    /// Whether the change exceeded the filter threshold
    pub emit: bool,
}

impl HeadingUpdate {
    /// The event to publish, if the threshold was exceeded
    pub fn event(&self) -> Option<HeadingEvent> {
        self.emit.then(|| HeadingEvent::new(self.heading))
    }
}

/// Stateful accelerometer + magnetometer heading filter
///
/// Each raw sample is smoothed into its vector and followed by a recompute:
/// rotation matrix, azimuth, screen-rotation compensation and a threshold
/// comparison against the last reported heading. The estimator performs no
/// I/O; callers decide what to do with the returned [`HeadingUpdate`].
///
/// # Example
/// ```
/// use compass_heading::config::HeadingConfig;
/// use compass_heading::heading::HeadingEstimator;
/// use compass_heading::signal_processing::Vector3;
///
/// let mut estimator = HeadingEstimator::new(&HeadingConfig::default());
/// for _ in 0..300 {
///     estimator.on_accelerometer_sample(Vector3::new(0.0, 0.0, 9.81));
///     estimator.on_magnetometer_sample(Vector3::new(-11.0, 19.05, -40.0));
/// }
/// assert_eq!(estimator.heading(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct HeadingEstimator {
    gravity: ExponentialSmoother,
    geomagnetic: ExponentialSmoother,
    limits: OrientationLimits,
    filter_threshold: u32,
    rotation: DeviceRotation,
    heading: u16,
    attitude: Option<(RotationMatrix, InclinationMatrix)>,
}

impl HeadingEstimator {
    pub fn new(config: &HeadingConfig) -> Self {
        Self {
            gravity: ExponentialSmoother::new(config.smoothing_alpha),
            geomagnetic: ExponentialSmoother::new(config.smoothing_alpha),
            limits: config.orientation.clone(),
            filter_threshold: config.filter_threshold,
            rotation: DeviceRotation::Rotation0,
            heading: 0,
            attitude: None,
        }
    }

    /// Set the minimum heading change required before an event is emitted.
    /// Zero emits on every change.
    pub fn configure(&mut self, filter_threshold: u32) {
        self.filter_threshold = filter_threshold;
    }

    /// Set the screen rotation applied from the next recompute onward
    pub fn set_device_rotation(&mut self, rotation: DeviceRotation) {
        self.rotation = rotation;
    }

    pub fn on_accelerometer_sample(&mut self, sample: Vector3) -> Option<HeadingUpdate> {
        self.gravity.update(sample);
        self.recompute()
    }

    pub fn on_magnetometer_sample(&mut self, sample: Vector3) -> Option<HeadingUpdate> {
        self.geomagnetic.update(sample);
        self.recompute()
    }

    /// Last reported heading in degrees
    pub fn heading(&self) -> u16 {
        self.heading
    }

    pub fn filter_threshold(&self) -> u32 {
        self.filter_threshold
    }

    pub fn device_rotation(&self) -> DeviceRotation {
        self.rotation
    }

    pub fn gravity(&self) -> Vector3 {
        self.gravity.value()
    }

    pub fn geomagnetic(&self) -> Vector3 {
        self.geomagnetic.value()
    }

    /// Rotation matrix from the most recent successful recompute
    pub fn rotation_matrix(&self) -> Option<&RotationMatrix> {
        self.attitude.as_ref().map(|(r, _)| r)
    }

    /// Inclination matrix from the most recent successful recompute
    pub fn inclination_matrix(&self) -> Option<&InclinationMatrix> {
        self.attitude.as_ref().map(|(_, i)| i)
    }

    /// Returns `None` when the current vector pair yields no orientation;
    /// the reported heading is left untouched in that case.
    fn recompute(&mut self) -> Option<HeadingUpdate> {
        let (r, i) = rotation_matrix_from_vectors(
            &self.gravity.value(),
            &self.geomagnetic.value(),
            &self.limits,
        )?;
        self.attitude = Some((r, i));

        let orientation = Orientation::from_rotation_matrix(&r);
        let raw_heading = radians_to_heading(orientation.azimuth);
        log::trace!("Raw azimuth: {}", raw_heading);
        log::trace!("Magnetic dip: {:.1}°", i.inclination().to_degrees());

        let heading = compensate_heading(raw_heading, self.rotation);
        log::trace!("Adjusted azimuth after {} rotation: {}", self.rotation, heading);

        let emit = u32::from(degrees_delta(heading, self.heading)) > self.filter_threshold;
        if emit {
            self.heading = heading;
            log::debug!("Heading updated: {}°", heading);
        }

        Some(HeadingUpdate {
            orientation,
            raw_heading,
            heading,
            emit,
        })
    }
}

impl Default for HeadingEstimator {
    fn default() -> Self {
        Self::new(&HeadingConfig::default())
    }
}
