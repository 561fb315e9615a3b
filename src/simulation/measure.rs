use crate::heading::{HeadingEstimator, HeadingEvent};
use crate::sensor::{SensorKind, SensorSample};

/// Signed heading error wrapped into (-180, 180]
pub fn angle_error(measured: f32, expected: f32) -> f32 {
    let mut e = measured - expected;
    if e > 180.0 {
        e -= 360.0;
    } else if e <= -180.0 {
        e += 360.0;
    }
    e
}

/// Feed samples through an estimator in order, collecting emitted events
pub fn replay_through_estimator(
    estimator: &mut HeadingEstimator,
    samples: &[SensorSample],
) -> Vec<HeadingEvent> {
    samples
        .iter()
        .filter_map(|sample| {
            let update = match sample.kind {
                SensorKind::Accelerometer => estimator.on_accelerometer_sample(sample.values),
                SensorKind::Magnetometer => estimator.on_magnetometer_sample(sample.values),
            };
            update.and_then(|u| u.event())
        })
        .collect()
}
