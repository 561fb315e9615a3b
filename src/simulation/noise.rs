use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::sensor::{SensorKind, SensorSample};
use crate::signal_processing::Vector3;

#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    /// Per-axis standard deviation of accelerometer noise in m/s²
    pub accel_std: f32,
    /// Per-axis standard deviation of magnetometer noise in µT
    pub mag_std: f32,
    /// Constant magnetometer offset in µT (uncalibrated hard iron)
    pub mag_bias: [f32; 3],
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_accel_noise(mut self, std: f32) -> Self {
        self.accel_std = std;
        self
    }

    pub fn with_mag_noise(mut self, std: f32) -> Self {
        self.mag_std = std;
        self
    }

    pub fn with_mag_bias(mut self, bias: [f32; 3]) -> Self {
        self.mag_bias = bias;
        self
    }
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

fn gaussian(std: f32) -> Option<Normal<f64>> {
    if std > 0.0 {
        Normal::new(0.0, std as f64).ok()
    } else {
        None
    }
}

/// Add Gaussian noise and magnetometer bias to every sample in place
pub fn apply_noise(samples: &mut [SensorSample], config: &NoiseConfig) {
    let mut rng = create_rng(config.seed);
    let accel = gaussian(config.accel_std);
    let mag = gaussian(config.mag_std);
    let bias = Vector3::from(config.mag_bias);

    for sample in samples.iter_mut() {
        let distribution = match sample.kind {
            SensorKind::Accelerometer => accel.as_ref(),
            SensorKind::Magnetometer => {
                sample.values = sample.values + bias;
                mag.as_ref()
            }
        };

        if let Some(normal) = distribution {
            let jitter = Vector3::new(
                normal.sample(&mut rng) as f32,
                normal.sample(&mut rng) as f32,
                normal.sample(&mut rng) as f32,
            );
            sample.values = sample.values + jitter;
        }
    }
}
