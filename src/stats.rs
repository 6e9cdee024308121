//! Small numeric helpers: prefix sums, running averages, argmax/argsort.
//!
//! Tie-breaks are explicit and deterministic: among equal values the lowest
//! index wins.

/// Prefix sums: `out[t] = xs[0] + ... + xs[t]`.
pub fn cumulative_sum(xs: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    xs.iter()
        .map(|&x| {
            acc += x;
            acc
        })
        .collect()
}

/// Running average: `out[t] = (xs[0] + ... + xs[t]) / (t + 1)`.
pub fn running_average(xs: &[f64]) -> Vec<f64> {
    cumulative_sum(xs)
        .into_iter()
        .enumerate()
        .map(|(t, s)| s / (t + 1) as f64)
        .collect()
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Index of the maximum value; the lowest index wins among equal maxima.
///
/// NaN entries are skipped. Returns `None` if `xs` is empty or all-NaN.
pub fn argmax(xs: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &x) in xs.iter().enumerate() {
        if x.is_nan() {
            continue;
        }
        match best {
            // Strict `>` keeps the first maximum.
            Some((_, b)) if x > b => best = Some((i, x)),
            None => best = Some((i, x)),
            _ => {}
        }
    }
    best.map(|(i, _)| i)
}

/// Indices that sort `xs` ascending; equal values keep index order.
pub fn argsort_ascending(xs: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..xs.len()).collect();
    idx.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]).then_with(|| a.cmp(&b)));
    idx
}
