use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use compass_heading::config::SamplingRate;
use compass_heading::sensor::{SensorKind, SensorListener, SensorSample, SensorSource};
use compass_heading::signal_processing::Vector3;
use compass_heading::{HeadingError, Result};

type Registrations = Arc<Mutex<Vec<(SensorKind, Arc<dyn SensorListener>)>>>;

/// In-memory sensor source; tests push samples through a [`MockHandle`]
pub struct MockSource {
    present: HashSet<SensorKind>,
    failing_register: Option<SensorKind>,
    failing_query: bool,
    burst_on_register: Option<(SensorKind, Vec<(SensorKind, Vector3)>)>,
    registrations: Registrations,
}

#[derive(Clone)]
pub struct MockHandle {
    registrations: Registrations,
}

#[allow(dead_code)]
impl MockSource {
    pub fn new() -> Self {
        Self {
            present: SensorKind::ALL.into_iter().collect(),
            failing_register: None,
            failing_query: false,
            burst_on_register: None,
            registrations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn without(mut self, kind: SensorKind) -> Self {
        self.present.remove(&kind);
        self
    }

    pub fn failing_register(mut self, kind: SensorKind) -> Self {
        self.failing_register = Some(kind);
        self
    }

    pub fn failing_query(mut self) -> Self {
        self.failing_query = true;
        self
    }

    /// Deliver `samples` synchronously from inside `register(kind)`, the
    /// way a platform may flush buffered readings on subscription
    pub fn burst_on_register(
        mut self,
        kind: SensorKind,
        samples: Vec<(SensorKind, Vector3)>,
    ) -> Self {
        self.burst_on_register = Some((kind, samples));
        self
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            registrations: self.registrations.clone(),
        }
    }
}

impl SensorSource for MockSource {
    fn has_sensor(&self, kind: SensorKind) -> Result<bool> {
        if self.failing_query {
            return Err(HeadingError::SensorUnavailable(kind));
        }
        Ok(self.present.contains(&kind))
    }

    fn register(
        &mut self,
        kind: SensorKind,
        _rate: SamplingRate,
        listener: Arc<dyn SensorListener>,
    ) -> Result<()> {
        if self.failing_register == Some(kind) {
            return Err(HeadingError::Registration(format!("{} busy", kind)));
        }
        self.registrations.lock().unwrap().push((kind, listener.clone()));
        if let Some((burst_kind, samples)) = &self.burst_on_register {
            if *burst_kind == kind {
                for (sample_kind, values) in samples {
                    listener.on_sample(SensorSample::new(*sample_kind, 0, *values));
                }
            }
        }
        Ok(())
    }

    fn unregister_all(&mut self) {
        self.registrations.lock().unwrap().clear();
    }
}

#[allow(dead_code)]
impl MockHandle {
    pub fn push(&self, kind: SensorKind, values: Vector3) {
        let listeners: Vec<_> = self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener.on_sample(SensorSample::new(kind, 0, values));
        }
    }

    pub fn push_pair(&self, gravity: Vector3, field: Vector3) {
        self.push(SensorKind::Accelerometer, gravity);
        self.push(SensorKind::Magnetometer, field);
    }

    pub fn registered(&self) -> usize {
        self.registrations.lock().unwrap().len()
    }
}
