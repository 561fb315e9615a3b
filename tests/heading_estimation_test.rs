use approx::assert_abs_diff_eq;

use compass_heading::config::{DeviceRotation, HeadingConfig};
use compass_heading::heading::HeadingEstimator;
use compass_heading::signal_processing::Vector3;
use compass_heading::simulation::{
    FieldConfig, MotionConfig, NoiseConfig, angle_error, apply_noise, flat_device_vectors,
    generate_samples, replay_through_estimator,
};

fn estimator_with_threshold(threshold: u32) -> HeadingEstimator {
    let config = HeadingConfig {
        filter_threshold: threshold,
        ..Default::default()
    };
    HeadingEstimator::new(&config)
}

#[test]
fn test_heading_always_in_range() {
    for (seed, turn_rate) in [(1u64, 37.0f32), (2, -53.0), (3, 181.0), (4, -720.0)] {
        let motion = MotionConfig {
            duration_secs: 8.0,
            ..Default::default()
        };
        let mut samples = generate_samples(&motion, |t| 17.0 + turn_rate * t);
        apply_noise(
            &mut samples,
            &NoiseConfig::default()
                .with_seed(seed)
                .with_accel_noise(0.3)
                .with_mag_noise(2.0),
        );

        let mut estimator = estimator_with_threshold(0);
        let events = replay_through_estimator(&mut estimator, &samples);

        assert!(!events.is_empty(), "No events for seed {}", seed);
        for event in &events {
            assert!(
                (0.0..360.0).contains(&event.heading),
                "Heading {} out of range",
                event.heading
            );
            assert_eq!(event.heading.fract(), 0.0);
            assert_eq!(event.accuracy, 1.0);
        }
        assert!(estimator.heading() < 360);
    }
}

#[test]
fn test_repeated_sample_after_convergence_is_silent() {
    let (gravity, field) = flat_device_vectors(143.5, &FieldConfig::default());
    let mut estimator = estimator_with_threshold(1);

    for _ in 0..1000 {
        estimator.on_accelerometer_sample(gravity);
        estimator.on_magnetometer_sample(field);
    }
    let settled = estimator.heading();

    for _ in 0..500 {
        let a = estimator.on_accelerometer_sample(gravity).unwrap();
        let m = estimator.on_magnetometer_sample(field).unwrap();
        assert!(!a.emit && !m.emit);
    }
    assert_eq!(estimator.heading(), settled);
    assert_eq!(settled, 143);
}

#[test]
fn test_larger_threshold_emits_fewer_events() {
    // Slow clockwise turn from 5° to 355°
    let motion = MotionConfig {
        duration_secs: 35.0,
        ..Default::default()
    };
    let samples = generate_samples(&motion, |t| 5.0 + 10.0 * t);

    let counts: Vec<usize> = [0u32, 1, 2, 5, 10, 30, 90]
        .iter()
        .map(|&threshold| {
            let mut estimator = estimator_with_threshold(threshold);
            replay_through_estimator(&mut estimator, &samples).len()
        })
        .collect();

    for pair in counts.windows(2) {
        assert!(
            pair[1] <= pair[0],
            "Event counts not monotonic: {:?}",
            counts
        );
    }
    assert!(counts[0] > counts[counts.len() - 1]);
}

#[test]
fn test_rotation_compensation_from_raw_ten_degrees() {
    let (gravity, field) = flat_device_vectors(10.5, &FieldConfig::default());

    for (rotation, expected) in [
        (DeviceRotation::Rotation0, 10),
        (DeviceRotation::Rotation90, 100),
        (DeviceRotation::Rotation180, 190),
        (DeviceRotation::Rotation270, 280),
    ] {
        let mut estimator = estimator_with_threshold(1);
        estimator.set_device_rotation(rotation);
        for _ in 0..300 {
            estimator.on_accelerometer_sample(gravity);
            estimator.on_magnetometer_sample(field);
        }
        assert_eq!(estimator.heading(), expected, "rotation {}", rotation);
    }
}

#[test]
fn test_zero_vectors_never_emit() {
    for threshold in [0, 1, 5, 359] {
        let mut estimator = estimator_with_threshold(threshold);
        for _ in 0..500 {
            assert!(estimator.on_accelerometer_sample(Vector3::ZERO).is_none());
            assert!(estimator.on_magnetometer_sample(Vector3::ZERO).is_none());
        }
        assert_eq!(estimator.heading(), 0);
    }
}

#[test]
fn test_smoothed_vectors_converge() {
    let gravity = Vector3::new(0.3, 9.7, 1.1);
    let field = Vector3::new(5.0, 30.0, -20.0);
    let mut estimator = estimator_with_threshold(1);

    // 0.97^600 is about 1.1e-8
    for _ in 0..600 {
        estimator.on_accelerometer_sample(gravity);
        estimator.on_magnetometer_sample(field);
    }

    let g = estimator.gravity();
    let m = estimator.geomagnetic();
    assert_abs_diff_eq!(g.x, gravity.x, epsilon = 1e-4);
    assert_abs_diff_eq!(g.y, gravity.y, epsilon = 1e-4);
    assert_abs_diff_eq!(g.z, gravity.z, epsilon = 1e-4);
    assert_abs_diff_eq!(m.x, field.x, epsilon = 1e-3);
    assert_abs_diff_eq!(m.y, field.y, epsilon = 1e-3);
    assert_abs_diff_eq!(m.z, field.z, epsilon = 1e-3);
}

#[test]
fn test_upright_device_scenario() {
    // Device held upright: gravity along +Y, field ahead and below.
    // Both vectors lie in the Y-Z plane, so the azimuth collapses to 0°
    // and nothing moves past the initial heading.
    let gravity = Vector3::new(0.0, 9.8, 0.0);
    let field = Vector3::new(0.0, 30.0, -20.0);
    let mut estimator = estimator_with_threshold(1);

    let mut events = Vec::new();
    for _ in 0..1000 {
        events.extend(estimator.on_accelerometer_sample(gravity).and_then(|u| u.event()));
        events.extend(estimator.on_magnetometer_sample(field).and_then(|u| u.event()));
    }
    assert!(events.is_empty(), "Unexpected events: {:?}", events);
    assert_eq!(estimator.heading(), 0);
}

#[test]
fn test_tilted_upright_device_single_event_then_silence() {
    // Rolled slightly off upright: azimuth is about -81.3°, truncated to -81
    let gravity = Vector3::new(1.0, 9.8, 0.0);
    let field = Vector3::new(0.0, 30.0, -20.0);
    let mut estimator = estimator_with_threshold(1);

    let mut events = Vec::new();
    for _ in 0..1000 {
        events.extend(estimator.on_accelerometer_sample(gravity).and_then(|u| u.event()));
        events.extend(estimator.on_magnetometer_sample(field).and_then(|u| u.event()));
    }
    assert_eq!(events.len(), 1, "Events: {:?}", events);
    assert_eq!(events[0].heading, 279.0);

    for _ in 0..200 {
        assert!(estimator.on_accelerometer_sample(gravity).and_then(|u| u.event()).is_none());
        assert!(estimator.on_magnetometer_sample(field).and_then(|u| u.event()).is_none());
    }
    assert_eq!(estimator.heading(), 279);
}

#[test]
fn test_flat_device_single_event_then_silence() {
    let (gravity, field) = flat_device_vectors(30.5, &FieldConfig::default());
    let mut estimator = estimator_with_threshold(1);

    let mut events = Vec::new();
    for _ in 0..1000 {
        events.extend(estimator.on_accelerometer_sample(gravity).and_then(|u| u.event()));
        events.extend(estimator.on_magnetometer_sample(field).and_then(|u| u.event()));
    }

    assert_eq!(events.len(), 1, "Events: {:?}", events);
    assert_eq!(events[0].heading, 30.0);
}

#[test]
fn test_noisy_heading_stays_close() {
    let motion = MotionConfig {
        duration_secs: 10.0,
        ..Default::default()
    };
    let mut samples = generate_samples(&motion, |_| 100.5);
    apply_noise(
        &mut samples,
        &NoiseConfig::default()
            .with_seed(42)
            .with_accel_noise(0.2)
            .with_mag_noise(0.5),
    );

    let mut estimator = estimator_with_threshold(2);
    let events = replay_through_estimator(&mut estimator, &samples);

    assert!(!events.is_empty());
    let error = angle_error(estimator.heading() as f32, 100.5);
    assert!(error.abs() < 3.0, "Heading error {}", error);

    // Smoothing plus the threshold keep noise from flooding the sink
    let settled = &events[events.len().min(3)..];
    assert!(settled.len() < 10, "Too many events after settling: {}", settled.len());
}
