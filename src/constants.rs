//! Numeric constants for the heading pipeline
//!
//! These constants define the smoothing factor and the stability limits used
//! when deriving orientation from gravity and magnetic field vectors.

/// Weight given to the previous smoothed value in the exponential filter.
/// A new sample contributes `1 - SMOOTHING_ALPHA`.
pub const SMOOTHING_ALPHA: f32 = 0.97;

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Squared gravity magnitude below which the device is treated as in free fall.
/// Equals 1% of standard gravity squared.
pub const FREE_FALL_GRAVITY_SQUARED: f32 = STANDARD_GRAVITY * STANDARD_GRAVITY * 0.01;

/// Relative threshold for the gravity × field cross product.
/// `|E × A| <= epsilon · |E| · |A|` means the two vectors are parallel or zero.
pub const DEGENERACY_EPSILON: f32 = 1e-3;

/// Accuracy attached to every emitted heading event.
pub const HEADING_ACCURACY: f64 = 1.0;
