//! Rounding and ratio helpers shared by the aggregation stages.

/// Round `value` to `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Percentage of `total`, rounded; zero when `total` is zero
pub fn percent_of(value: f64, total: f64, places: u32) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        round_to(value / total * 100.0, places)
    }
}

/// Ratio rounded; zero when the divisor is zero (never NaN)
pub fn safe_ratio(value: f64, divisor: f64, places: u32) -> f64 {
    if divisor == 0.0 {
        0.0
    } else {
        round_to(value / divisor, places)
    }
}
