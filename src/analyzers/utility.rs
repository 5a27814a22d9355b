/// Divides `total` by `count`, returning 0.0 when there is nothing to divide by.
pub fn safe_div(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
