//! Configuration for the compass heading pipeline.
//!
//! Settings can be built in code from `HeadingConfig::default()` or loaded
//! from a TOML file:
//!
//! ```toml
//! filter_threshold = 3
//! smoothing_alpha = 0.97
//! sampling_rate = "game"
//!
//! [orientation]
//! degeneracy_epsilon = 0.001
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{DEGENERACY_EPSILON, FREE_FALL_GRAVITY_SQUARED, SMOOTHING_ALPHA};
use crate::error::{HeadingError, Result};

/// Screen rotation relative to the device's natural orientation
///
/// # Parsing formats
/// - `90` - degrees (no suffix)
/// - `90deg` or `90°` - degrees (explicit)
///
/// # Example
/// ```
/// use compass_heading::config::DeviceRotation;
///
/// let rotation: DeviceRotation = "270deg".parse().unwrap();
/// assert_eq!(rotation, DeviceRotation::Rotation270);
/// assert_eq!(rotation.offset_degrees(), 270);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "u16")]
pub enum DeviceRotation {
    /// Natural orientation (portrait on phones)
    #[default]
    Rotation0,
    /// Rotated 90° (landscape right)
    Rotation90,
    /// Upside down
    Rotation180,
    /// Rotated 270° (landscape left)
    Rotation270,
}

impl DeviceRotation {
    /// Map a whole-degree screen rotation onto one of the four quadrants
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Rotation0),
            90 => Some(Self::Rotation90),
            180 => Some(Self::Rotation180),
            270 => Some(Self::Rotation270),
            _ => None,
        }
    }

    /// Degrees added to the sensor-frame azimuth to get the screen-frame heading
    pub fn offset_degrees(&self) -> u16 {
        match self {
            Self::Rotation0 => 0,
            Self::Rotation90 => 90,
            Self::Rotation180 => 180,
            Self::Rotation270 => 270,
        }
    }
}

impl TryFrom<u16> for DeviceRotation {
    type Error = String;

    fn try_from(degrees: u16) -> std::result::Result<Self, Self::Error> {
        Self::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {}", degrees))
    }
}

impl fmt::Display for DeviceRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.offset_degrees())
    }
}

impl FromStr for DeviceRotation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let num = s
            .strip_suffix("deg")
            .or_else(|| s.strip_suffix("°"))
            .unwrap_or(s);

        let degrees: u16 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid rotation: {}", s))?;
        Self::try_from(degrees)
    }
}

/// Requested delivery rate for raw sensor samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SamplingRate {
    /// As fast as the sensor produces samples
    Fastest,
    /// Suitable for games (20 ms)
    #[default]
    Game,
    /// Suitable for UI updates (66 ms)
    Ui,
    /// Suitable for screen orientation changes (200 ms)
    Normal,
}

impl SamplingRate {
    /// Minimum spacing between two delivered samples of one sensor
    pub fn interval(&self) -> Duration {
        match self {
            Self::Fastest => Duration::ZERO,
            Self::Game => Duration::from_millis(20),
            Self::Ui => Duration::from_millis(66),
            Self::Normal => Duration::from_millis(200),
        }
    }
}

/// Limits used when deriving a rotation matrix from gravity and field vectors
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrientationLimits {
    /// Squared gravity magnitude below which no orientation is derived
    pub free_fall_gravity_squared: f32,
    /// Relative cross-product magnitude below which the vectors count as parallel
    pub degeneracy_epsilon: f32,
}

impl Default for OrientationLimits {
    fn default() -> Self {
        Self {
            free_fall_gravity_squared: FREE_FALL_GRAVITY_SQUARED,
            degeneracy_epsilon: DEGENERACY_EPSILON,
        }
    }
}

/// Complete heading pipeline configuration
///
/// # Example
/// ```
/// use compass_heading::config::HeadingConfig;
///
/// let mut config = HeadingConfig::default();
/// config.filter_threshold = 5;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeadingConfig {
    /// Minimum heading change in degrees before a new event is emitted
    pub filter_threshold: u32,
    /// Exponential smoothing factor applied to both raw vectors
    pub smoothing_alpha: f32,
    /// Requested sampling rate tier for both sensors
    pub sampling_rate: SamplingRate,
    /// Orientation derivation limits
    pub orientation: OrientationLimits,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            filter_threshold: 1,
            smoothing_alpha: SMOOTHING_ALPHA,
            sampling_rate: SamplingRate::Game,
            orientation: OrientationLimits::default(),
        }
    }
}

impl HeadingConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| HeadingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| HeadingError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha < 1.0) {
            return Err(HeadingError::Config(format!(
                "smoothing_alpha must be in (0, 1), got {}",
                self.smoothing_alpha
            )));
        }

        let epsilon = self.orientation.degeneracy_epsilon;
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(HeadingError::Config(format!(
                "degeneracy_epsilon must be positive, got {}",
                epsilon
            )));
        }

        if !(self.orientation.free_fall_gravity_squared >= 0.0) {
            return Err(HeadingError::Config(
                "free_fall_gravity_squared must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
