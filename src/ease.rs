//! Shaping curves for the scroll-driven layer and post-processing envelopes.

/// Hermite step between `lo` and `hi`: 0 at or below `lo`, 1 at or above `hi`.
pub fn smoothstep(x: f64, lo: f64, hi: f64) -> f64 {
    if x <= lo {
        return 0.0;
    }
    if x >= hi {
        return 1.0;
    }
    let t = (x - lo) / (hi - lo);
    t * t * (3.0 - 2.0 * t)
}

/// Smoothstep rise over `[in_lo, in_hi]` times smoothstep fall over `[out_lo, out_hi]`.
pub fn envelope(x: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    smoothstep(x, in_lo, in_hi) * (1.0 - smoothstep(x, out_lo, out_hi))
}
