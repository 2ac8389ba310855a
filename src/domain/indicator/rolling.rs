//! Rolling-window and exponential-mean primitives shared by the indicators.
//!
//! All functions return one output slot per input slot; warm-up slots are
//! `None`. A full window is required before a value is emitted (no
//! partial-window averaging).

/// Trailing arithmetic mean over `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Rolling mean over a series that may itself carry undefined slots. A value
/// is emitted only when the trailing window of `window` slots holds `window`
/// defined values, mirroring a rolling mean with `min_periods == window` over
/// a series with leading gaps.
pub fn rolling_mean_opt(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    for i in 0..values.len() {
        if i + 1 < window {
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        if slice.iter().all(Option::is_some) {
            let sum: f64 = slice.iter().map(|v| v.unwrap_or(0.0)).sum();
            out[i] = Some(sum / window as f64);
        }
    }
    out
}

/// Rolling sample standard deviation (n−1 denominator) over `window` values.
/// A window of 1 has no sample deviation and stays undefined.
pub fn rolling_stddev(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }
    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let sum_sq: f64 = slice.iter().map(|v| (v - mean) * (v - mean)).sum();
        out[i] = Some((sum_sq / (window - 1) as f64).sqrt());
    }
    out
}

/// Recursive exponential mean with decay `2/(span+1)`, seeded by the recursion
/// itself from the first defined value (no SMA seeding). Output is undefined
/// until `span` values have been observed. Undefined inputs are skipped and do
/// not advance the recursion.
pub fn ewm(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if span == 0 {
        return out;
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut state: Option<f64> = None;
    let mut observed = 0usize;
    for (i, value) in values.iter().enumerate() {
        let Some(x) = value else { continue };
        state = Some(match state {
            None => *x,
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
        });
        observed += 1;
        if observed >= span {
            out[i] = state;
        }
    }
    out
}
