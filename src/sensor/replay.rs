//! Sensor source backed by a recorded sample stream.
//!
//! Recordings are JSON lines, one sample per line:
//!
//! ```text
//! {"sensor":"accelerometer","timestamp_ns":0,"values":{"x":0.0,"y":0.0,"z":9.81}}
//! {"sensor":"magnetometer","timestamp_ns":5000000,"values":{"x":-11.0,"y":19.05,"z":-40.0}}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Each registered
//! sensor is replayed on its own thread, so accelerometer and magnetometer
//! deliveries interleave the way they do on a device.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};

use super::{SensorKind, SensorListener, SensorSample, SensorSource};
use crate::config::SamplingRate;
use crate::error::{HeadingError, Result};

pub fn read_recording<R: BufRead>(reader: R) -> Result<Vec<SensorSample>> {
    let mut samples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|e| HeadingError::Recording {
            line: line_no,
            message: e.to_string(),
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample = serde_json::from_str(trimmed).map_err(|e| HeadingError::Recording {
            line: line_no,
            message: e.to_string(),
        })?;
        samples.push(sample);
    }
    Ok(samples)
}

pub fn write_recording<W: Write>(mut writer: W, samples: &[SensorSample]) -> std::io::Result<()> {
    for sample in samples {
        serde_json::to_writer(&mut writer, sample)?;
        writeln!(writer)?;
    }
    writer.flush()
}

/// Samples of one sensor that a subscriber at `rate` would receive.
///
/// A sample is kept when at least the rate interval has passed since the
/// previously kept sample of the same sensor.
pub fn select_samples(
    samples: &[SensorSample],
    kind: SensorKind,
    rate: SamplingRate,
) -> Vec<SensorSample> {
    let interval_ns = rate.interval().as_nanos() as u64;
    let mut last_kept: Option<u64> = None;
    let mut selected = Vec::new();

    for sample in samples.iter().filter(|s| s.kind == kind) {
        if let Some(last) = last_kept {
            if sample.timestamp_ns.saturating_sub(last) < interval_ns {
                continue;
            }
        }
        last_kept = Some(sample.timestamp_ns);
        selected.push(*sample);
    }

    selected
}

struct ReplayWorker {
    kind: SensorKind,
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl ReplayWorker {
    /// Wake the thread out of any pacing wait and wait for it to exit
    fn halt(self) {
        // Full or disconnected both mean the thread is already on its way out
        let _ = self.stop.try_send(());
        self.join();
    }

    fn join(self) {
        if self.handle.join().is_err() {
            log::error!("Replay thread for {} panicked", self.kind);
        }
    }
}

/// Deliver `selected` in order, pacing by recorded timestamps when
/// `realtime`. Returns early once `stop` is signalled.
fn replay(
    selected: Vec<SensorSample>,
    realtime: bool,
    stop: Receiver<()>,
    listener: Arc<dyn SensorListener>,
) {
    let mut previous: Option<u64> = None;
    for sample in selected {
        if realtime {
            let gap = previous
                .map(|prev| Duration::from_nanos(sample.timestamp_ns.saturating_sub(prev)))
                .unwrap_or(Duration::ZERO);
            match stop.recv_timeout(gap) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
            }
            previous = Some(sample.timestamp_ns);
        } else {
            match stop.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Disconnected) => return,
            }
        }
        listener.on_sample(sample);
    }
}

pub struct ReplaySource {
    samples: Arc<Vec<SensorSample>>,
    realtime: bool,
    workers: Vec<ReplayWorker>,
}

impl ReplaySource {
    pub fn new(samples: Vec<SensorSample>) -> Self {
        Self {
            samples: Arc::new(samples),
            realtime: false,
            workers: Vec::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HeadingError::Recording {
            line: 0,
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok(Self::new(read_recording(BufReader::new(file))?))
    }

    /// Pace deliveries by the recorded timestamps instead of replaying
    /// as fast as possible
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Block until every registered sensor has delivered its whole recording
    pub fn join(&mut self) {
        self.workers.drain(..).for_each(ReplayWorker::join);
    }

    fn halt(&mut self, kind: SensorKind) {
        let (halted, kept): (Vec<_>, Vec<_>) =
            self.workers.drain(..).partition(|w| w.kind == kind);
        self.workers = kept;
        halted.into_iter().for_each(ReplayWorker::halt);
    }
}

impl SensorSource for ReplaySource {
    fn has_sensor(&self, kind: SensorKind) -> Result<bool> {
        Ok(self.samples.iter().any(|s| s.kind == kind))
    }

    fn register(
        &mut self,
        kind: SensorKind,
        rate: SamplingRate,
        listener: Arc<dyn SensorListener>,
    ) -> Result<()> {
        if !self.has_sensor(kind)? {
            return Err(HeadingError::SensorUnavailable(kind));
        }
        self.halt(kind);

        let selected = select_samples(&self.samples, kind, rate);
        log::debug!(
            "Replaying {} {} samples at {:?}",
            selected.len(),
            kind,
            rate
        );

        let (stop, stop_rx) = bounded(1);
        let realtime = self.realtime;

        let handle = std::thread::Builder::new()
            .name(format!("replay-{}", kind))
            .spawn(move || replay(selected, realtime, stop_rx, listener))
            .map_err(|e| HeadingError::Registration(format!("{}: {}", kind, e)))?;

        self.workers.push(ReplayWorker { kind, stop, handle });
        Ok(())
    }

    fn unregister_all(&mut self) {
        self.workers.drain(..).for_each(ReplayWorker::halt);
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        self.unregister_all();
    }
}
