/// Missing or non-finite values count as zero.
pub(crate) fn finite_or_zero(v: Option<f64>) -> f64 {
    match v {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Scale factors fall back to the neutral `1.0` when missing, non-finite or zero.
pub(crate) fn scale_or_one(v: Option<f64>) -> f64 {
    let v = finite_or_zero(v);
    if v == 0.0 { 1.0 } else { v }
}

/// Speed used when dividing frame counts: only strictly positive finite speeds count.
pub(crate) fn positive_speed_or_one(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        1.0
    }
}

/// Collapses NaN/inf and negative results to zero.
pub(crate) fn non_negative_finite(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
