//! Device attitude from gravity and geomagnetic field vectors.
//!
//! The rotation matrix `R` maps device coordinates onto a world frame whose
//! axes point East, magnetic North and Up. Its rows are those three world
//! axes expressed in device coordinates:
//!
//! - `H = E × A` (East, perpendicular to gravity and the field)
//! - `M = A × H` (magnetic North projected onto the horizontal plane)
//! - `A` (Up, opposite to free-fall acceleration)
//!
//! The inclination matrix `I` rotates the field vector into the same frame
//! and encodes the magnetic dip angle.

use crate::config::OrientationLimits;
use crate::signal_processing::Vector3;

/// Row-major 3×3 matrix mapping device coordinates to East/North/Up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub [[f32; 3]; 3]);

/// Row-major 3×3 matrix describing magnetic inclination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InclinationMatrix(pub [[f32; 3]; 3]);

impl InclinationMatrix {
    /// Magnetic dip angle in radians, negative when the field points below the horizon
    pub fn inclination(&self) -> f32 {
        self.0[1][2].atan2(self.0[1][1])
    }
}

/// Euler angles in radians extracted from a rotation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Rotation around -Z, 0 when the device Y axis points at magnetic north
    pub azimuth: f32,
    /// Rotation around -X
    pub pitch: f32,
    /// Rotation around Y
    pub roll: f32,
}

impl Orientation {
    pub fn from_rotation_matrix(r: &RotationMatrix) -> Self {
        let r = &r.0;
        Self {
            azimuth: r[0][1].atan2(r[1][1]),
            pitch: (-r[2][1]).clamp(-1.0, 1.0).asin(),
            roll: (-r[2][0]).atan2(r[2][2]),
        }
    }
}

/// Derive `R` and `I` from smoothed gravity and geomagnetic vectors.
///
/// Returns `None` when gravity is below the free-fall limit, when either
/// vector is zero, or when the two are parallel within the configured
/// relative epsilon.
pub fn rotation_matrix_from_vectors(
    gravity: &Vector3,
    geomagnetic: &Vector3,
    limits: &OrientationLimits,
) -> Option<(RotationMatrix, InclinationMatrix)> {
    if !gravity.is_finite() || !geomagnetic.is_finite() {
        return None;
    }

    let gravity_norm_sq = gravity.norm_squared();
    if gravity_norm_sq < limits.free_fall_gravity_squared || gravity_norm_sq == 0.0 {
        return None;
    }

    let field_norm = geomagnetic.norm();
    if field_norm == 0.0 {
        return None;
    }

    let gravity_norm = gravity_norm_sq.sqrt();
    let east = geomagnetic.cross(gravity);
    let east_norm = east.norm();
    if east_norm <= limits.degeneracy_epsilon * field_norm * gravity_norm {
        return None;
    }

    let h = east * (1.0 / east_norm);
    let a = *gravity * (1.0 / gravity_norm);
    let m = a.cross(&h);

    let rotation = RotationMatrix([h.to_array(), m.to_array(), a.to_array()]);

    let inv_field = 1.0 / field_norm;
    let c = geomagnetic.dot(&m) * inv_field;
    let s = geomagnetic.dot(&a) * inv_field;
    let inclination = InclinationMatrix([[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]]);

    Some((rotation, inclination))
}
