use super::Vector3;

/// Single-pole low-pass filter over a three-axis signal.
///
/// Each update blends the new sample into the running state:
/// `state = alpha * state + (1 - alpha) * sample`. The state starts at zero
/// and is never reset, so it ramps toward the first samples it sees.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    state: Vector3,
    alpha: f32,
}

impl ExponentialSmoother {
    /// Create a smoother starting from the zero vector.
    /// Alpha close to 1 adapts slowly.
    pub fn new(alpha: f32) -> Self {
        Self {
            state: Vector3::ZERO,
            alpha,
        }
    }

    /// Blend a raw sample into the state and return the updated value.
    pub fn update(&mut self, sample: Vector3) -> Vector3 {
        self.state = self.state * self.alpha + sample * (1.0 - self.alpha);
        self.state
    }

    pub fn value(&self) -> Vector3 {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}
