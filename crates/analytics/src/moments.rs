//! Sample moments over the defined observations of a return series.
//!
//! Every function takes plain `f64`s (use `core_types::defined` to drop the
//! undefined slots first) and reports "not enough observations" or a zero
//! variance as an undefined `Value`.

use core_types::Value;

pub fn mean(xs: &[f64]) -> Value {
    if xs.is_empty() {
        return Value::NA;
    }
    Value::new(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Unbiased sample variance (denominator `n - 1`).
pub fn variance(xs: &[f64]) -> Value {
    covariance(xs, xs)
}

/// Sample standard deviation (denominator `n - 1`).
pub fn std_dev(xs: &[f64]) -> Value {
    variance(xs).sqrt()
}

/// Unbiased sample covariance of two equally long samples.
pub fn covariance(xs: &[f64], ys: &[f64]) -> Value {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Value::NA;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let (Some(mx), Some(my)) = (mean(xs).get(), mean(ys).get()) else {
        return Value::NA;
    };
    let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    Value::new(sum / (n - 1) as f64)
}

/// Central moment sums `(Σd², Σd³, Σd⁴)`, or `None` when the sample has no spread.
fn central_sums(xs: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(xs).get()?;
    let (mut s2, mut s3, mut s4) = (0.0, 0.0, 0.0);
    for x in xs {
        let d = x - m;
        let d2 = d * d;
        s2 += d2;
        s3 += d2 * d;
        s4 += d2 * d2;
    }
    (s2 > 0.0).then_some((s2, s3, s4))
}

/// Bias-corrected sample skewness (adjusted Fisher-Pearson), for `n >= 3`.
pub fn skew(xs: &[f64]) -> Value {
    let n = xs.len() as f64;
    if xs.len() < 3 {
        return Value::NA;
    }
    let Some((s2, s3, _)) = central_sums(xs) else {
        return Value::NA;
    };
    let (m2, m3) = (s2 / n, s3 / n);
    Value::new((n * (n - 1.0)).sqrt() / (n - 2.0) * m3 / m2.powf(1.5))
}

/// Bias-corrected sample excess kurtosis, for `n >= 4`.
pub fn kurtosis(xs: &[f64]) -> Value {
    let n = xs.len() as f64;
    if xs.len() < 4 {
        return Value::NA;
    }
    let Some((s2, _, s4)) = central_sums(xs) else {
        return Value::NA;
    };
    let numerator = n * (n + 1.0) * (n - 1.0) * s4;
    let denominator = (n - 2.0) * (n - 3.0) * s2 * s2;
    let adjustment = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Value::new(numerator / denominator - adjustment)
}
