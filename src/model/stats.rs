//! Small statistical helpers for the forecast engine.

// Abramowitz & Stegun 26.2.23 rational approximation, |error| < 4.5e-4.
const NUM: [f64; 3] = [2.515517, 0.802853, 0.010328];
const DEN: [f64; 4] = [1.0, 1.432788, 0.189269, 0.001308];

fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Approximate quantile function for the standard normal distribution,
/// accurate to roughly 4.5e-4, which is plenty for uncertainty bands.
pub fn quantile_normal(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    // Evaluate on the lower tail and mirror for the upper half.
    let tail = p.min(1.0 - p);
    let t = (-2.0 * tail.ln()).sqrt();
    let z = t - horner(&NUM, t) / horner(&DEN, t);

    if p < 0.5 {
        -z
    } else {
        z
    }
}

/// Mean of a slice, NaN when empty.
pub fn mean(values: &[f64]) -> f64 {
    match values.len() {
        0 => f64::NAN,
        n => values.iter().sum::<f64>() / n as f64,
    }
}
