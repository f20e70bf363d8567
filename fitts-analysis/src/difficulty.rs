use crate::stats::round_to;

/// Decimal places IDs are rounded to; rows sharing a (bin, diameter) pair end up
/// with identical IDs and group together.
pub const ID_DECIMALS: i32 = 2;

/// Unrounded Fitts index of difficulty, `log2(D/W + 1)`.
///
/// `None` when the width is not positive.
pub fn index_of_difficulty(distance: f64, width: f64) -> Option<f64> {
    if width > 0.0 {
        Some((distance / width + 1.0).log2())
    } else {
        None
    }
}

pub fn rounded_id(raw: f64) -> f64 {
    round_to(raw, ID_DECIMALS)
}

/// Throughput in bits/s for a given ID and movement time in milliseconds.
pub fn index_of_performance(id: f64, movement_time_ms: f64) -> f64 {
    id / (movement_time_ms / 1000.0)
}
