use serde::Serialize;

use crate::constants::HEADING_ACCURACY;

/// Name under which heading events are published to listeners
pub const HEADING_UPDATED: &str = "HeadingUpdated";

/// Heading notification delivered to the event sink
///
/// `heading` always holds a whole number of degrees in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadingEvent {
    /// Screen-frame heading in degrees clockwise from magnetic north
    pub heading: f64,
    /// Reported accuracy in degrees
    pub accuracy: f64,
}

impl HeadingEvent {
    pub fn new(heading: u16) -> Self {
        Self {
            heading: f64::from(heading),
            accuracy: HEADING_ACCURACY,
        }
    }
}
