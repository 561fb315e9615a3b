use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{DeviceRotation, HeadingConfig, SamplingRate};
use crate::error::Result;
use crate::heading::HeadingEstimator;
use crate::sensor::{
    HeadingSink, RotationProvider, SensorKind, SensorListener, SensorSample, SensorSource,
};
use crate::signal_processing::Vector3;

struct ServiceState {
    estimator: HeadingEstimator,
    running: bool,
}

/// State shared with the sensor delivery threads
struct Shared {
    state: Mutex<ServiceState>,
    rotation: Option<Box<dyn RotationProvider>>,
    sink: Box<dyn HeadingSink>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SensorListener for Shared {
    fn on_sample(&self, sample: SensorSample) {
        // Smoothing, recompute and emission happen under one lock
        let mut state = self.lock();
        if !state.running {
            return;
        }

        if let Some(provider) = &self.rotation {
            let rotation = provider
                .current_rotation()
                .unwrap_or(DeviceRotation::Rotation0);
            state.estimator.set_device_rotation(rotation);
        }

        let update = match sample.kind {
            SensorKind::Accelerometer => state.estimator.on_accelerometer_sample(sample.values),
            SensorKind::Magnetometer => state.estimator.on_magnetometer_sample(sample.values),
        };

        if let Some(event) = update.and_then(|u| u.event()) {
            self.sink.heading_updated(event);
        }
    }
}

/// Start/stop control around a [`HeadingEstimator`] fed by a sensor source
///
/// The estimator lives behind a single mutex shared with the source's
/// delivery threads. Smoothed vectors and the last reported heading survive
/// `stop`, so a later `start` continues from where the filter left off.
pub struct CompassHeading<S: SensorSource> {
    source: S,
    shared: Arc<Shared>,
    sampling_rate: SamplingRate,
}

impl<S: SensorSource> CompassHeading<S> {
    pub fn new(source: S, config: &HeadingConfig, sink: impl HeadingSink + 'static) -> Self {
        Self::build(source, config, None, Box::new(sink))
    }

    /// Query `rotation` on every recompute instead of using pushed values
    pub fn with_rotation_provider(
        source: S,
        config: &HeadingConfig,
        rotation: impl RotationProvider + 'static,
        sink: impl HeadingSink + 'static,
    ) -> Self {
        Self::build(source, config, Some(Box::new(rotation)), Box::new(sink))
    }

    fn build(
        source: S,
        config: &HeadingConfig,
        rotation: Option<Box<dyn RotationProvider>>,
        sink: Box<dyn HeadingSink>,
    ) -> Self {
        Self {
            source,
            shared: Arc::new(Shared {
                state: Mutex::new(ServiceState {
                    estimator: HeadingEstimator::new(config),
                    running: false,
                }),
                rotation,
                sink,
            }),
            sampling_rate: config.sampling_rate,
        }
    }

    /// Subscribe to both sensors and begin emitting heading events.
    ///
    /// On failure every partial subscription is undone and the service stays
    /// stopped. Calling `start` while running only updates the threshold.
    pub fn start(&mut self, filter_threshold: u32) -> Result<()> {
        {
            let mut state = self.shared.lock();
            state.estimator.configure(filter_threshold);
            if state.running {
                log::debug!("Compass heading already running, filter now {}", filter_threshold);
                return Ok(());
            }
        }

        // Samples delivered before both registrations succeed are ignored
        for kind in SensorKind::ALL {
            let listener: Arc<dyn SensorListener> = self.shared.clone();
            if let Err(e) = self.source.register(kind, self.sampling_rate, listener) {
                log::error!("Failed to start compass heading: {}", e);
                self.source.unregister_all();
                return Err(e);
            }
        }
        self.shared.lock().running = true;

        log::info!("Compass heading started with filter: {}", filter_threshold);
        Ok(())
    }

    /// Unsubscribe from both sensors.
    ///
    /// Returns after any recompute already in progress has finished; samples
    /// delivered afterwards are ignored.
    pub fn stop(&mut self) {
        self.source.unregister_all();
        let mut state = self.shared.lock();
        if state.running {
            state.running = false;
            log::info!("Compass heading stopped");
        }
    }

    /// Whether both an accelerometer and a magnetometer are present.
    /// Query failures are logged and reported as `false`.
    pub fn has_compass(&self) -> bool {
        let check = || -> Result<bool> {
            Ok(self.source.has_sensor(SensorKind::Accelerometer)?
                && self.source.has_sensor(SensorKind::Magnetometer)?)
        };
        match check() {
            Ok(present) => present,
            Err(e) => {
                log::error!("Error checking for compass: {}", e);
                false
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    pub fn configure(&self, filter_threshold: u32) {
        self.shared.lock().estimator.configure(filter_threshold);
    }

    /// Push a new screen rotation; overridden by a rotation provider if set
    pub fn set_device_rotation(&self, rotation: DeviceRotation) {
        self.shared.lock().estimator.set_device_rotation(rotation);
    }

    /// Last reported heading in degrees
    pub fn heading(&self) -> u16 {
        self.shared.lock().estimator.heading()
    }

    /// Smoothed gravity vector
    pub fn gravity(&self) -> Vector3 {
        self.shared.lock().estimator.gravity()
    }

    /// Smoothed geomagnetic vector
    pub fn geomagnetic(&self) -> Vector3 {
        self.shared.lock().estimator.geomagnetic()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: SensorSource> Drop for CompassHeading<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
