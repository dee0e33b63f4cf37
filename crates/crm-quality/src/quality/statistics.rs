//! Sample statistics for the outlier rule.
//!
//! Values are divided by the largest magnitude in the sample before summing,
//! so samples near the ends of the `f64` range neither overflow nor underflow.
//! Z-scores do not change under that scaling.

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (scale, scaled) = normalized(values)?;
    Some(raw_mean(&scaled) * scale)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let (scale, scaled) = normalized(values)?;
    let mean = raw_mean(&scaled);
    Some(raw_std(&scaled, mean) * scale)
}

/// Population z-score of every value, in input order.
///
/// Returns `None` when the sample is empty or has no spread. Spread is
/// judged on the normalized sample, so only rounding noise relative to the
/// largest value counts as none.
pub fn z_scores(values: &[f64]) -> Option<Vec<f64>> {
    let (_, scaled) = normalized(values)?;
    let mean = raw_mean(&scaled);
    let std = raw_std(&scaled, mean);

    if !std.is_finite() || std <= f64::EPSILON {
        return None;
    }

    Some(scaled.iter().map(|v| (v - mean) / std).collect())
}

/// The sample divided by its largest magnitude, together with that magnitude.
fn normalized(values: &[f64]) -> Option<(f64, Vec<f64>)> {
    if values.is_empty() {
        return None;
    }

    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Some((1.0, values.to_vec()));
    }
    Some((scale, values.iter().map(|v| v / scale).collect()))
}

fn raw_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn raw_std(values: &[f64], mean: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
