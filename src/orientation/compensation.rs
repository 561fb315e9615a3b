use crate::config::DeviceRotation;
use crate::signal_processing::normalize_degrees;

/// Shift a sensor-frame heading into the screen frame
pub fn compensate_heading(raw_heading: u16, rotation: DeviceRotation) -> u16 {
    normalize_degrees(i32::from(raw_heading) + i32::from(rotation.offset_degrees()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compensation_offsets() {
        assert_eq!(compensate_heading(10, DeviceRotation::Rotation0), 10);
        assert_eq!(compensate_heading(10, DeviceRotation::Rotation90), 100);
        assert_eq!(compensate_heading(10, DeviceRotation::Rotation180), 190);
        assert_eq!(compensate_heading(10, DeviceRotation::Rotation270), 280);
    }

    #[test]
    fn test_compensation_wraps() {
        assert_eq!(compensate_heading(300, DeviceRotation::Rotation90), 30);
        assert_eq!(compensate_heading(359, DeviceRotation::Rotation270), 269);
        assert_eq!(compensate_heading(180, DeviceRotation::Rotation180), 0);
    }
}
