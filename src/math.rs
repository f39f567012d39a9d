//! Shared numerical primitives: sampling grids, table interpolation and count rounding.

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Primary complex scalar type used for spectral bins.
pub type CScalar = num_complex::Complex<Scalar>;

/// Generates `n` linearly spaced samples in [start, stop].
#[must_use]
pub fn linspace(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n as Scalar - 1.0);
            (0..n).map(|i| start + step * i as Scalar).collect()
        }
    }
}

/// Generates `n` uniformly spaced samples in [start, stop), i.e. one period without
/// repeating the wrap-around point.
#[must_use]
pub fn periodic_grid(start: Scalar, stop: Scalar, n: usize) -> Vec<Scalar> {
    if n == 0 {
        return Vec::new();
    }
    let step = (stop - start) / n as Scalar;
    (0..n).map(|i| start + step * i as Scalar).collect()
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`.
///
/// `xs` must be non-decreasing. Outside the table the first/last `ys` value is
/// returned, matching the usual `interp` convention. Returns `None` for an empty
/// or mismatched table.
#[must_use]
pub fn interp(x: Scalar, xs: &[Scalar], ys: &[Scalar]) -> Option<Scalar> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let last = xs.len() - 1;
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[last] {
        return Some(ys[last]);
    }
    // first index with xs[i] > x; guaranteed in 1..=last by the checks above
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let span = xs[hi] - xs[lo];
    if span <= 0.0 {
        return Some(ys[hi]);
    }
    let w = (x - xs[lo]) / span;
    Some(ys[lo] + w * (ys[hi] - ys[lo]))
}

/// Geometric mean of two positive values.
#[inline]
#[must_use]
pub fn geometric_mean(a: Scalar, b: Scalar) -> Scalar {
    (a * b).sqrt()
}

/// Rounds a device-count ratio up to a positive integer.
///
/// Returns `None` for non-finite ratios; ratios at or below zero still need one device.
#[must_use]
pub fn ceil_count(ratio: Scalar) -> Option<u32> {
    if !ratio.is_finite() || ratio > Scalar::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = ratio.ceil().max(1.0) as u32;
    Some(n)
}

/// Returns `true` when two table keys are equal up to floating-point representation error.
#[inline]
#[must_use]
pub fn same_key(a: Scalar, b: Scalar) -> bool {
    (a - b).abs() <= 1.0e-9 * a.abs().max(b.abs()).max(Scalar::MIN_POSITIVE)
}
