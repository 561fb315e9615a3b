/// Normalize whole degrees into [0, 360)
pub fn normalize_degrees(degrees: i32) -> u16 {
    degrees.rem_euclid(360) as u16
}

/// Plain absolute difference between two headings, without wrap-around
pub fn degrees_delta(a: u16, b: u16) -> u16 {
    a.abs_diff(b)
}

/// Truncate an angle in radians to whole degrees in [0, 360)
pub fn radians_to_heading(radians: f32) -> u16 {
    let degrees = radians.to_degrees();
    if !degrees.is_finite() {
        return 0;
    }
    normalize_degrees(degrees.trunc() as i32)
}
