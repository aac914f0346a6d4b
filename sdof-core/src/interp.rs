//! Linear interpolation over sorted sample slices.
//!
//! Lookups outside the sampled range extrapolate along the boundary
//! segment's slope rather than clamping, so a curve that ends in a flat
//! plateau continues flat and a curve that ends on a slope keeps sloping.
//!
//! The backbone curve uses these helpers directly instead of an owned
//! interpolator because its abscissa is offset by a per-run scalar shift;
//! callers subtract the shift before the lookup.

/// Slope of the segment between samples `i` and `i + 1`.
///
/// Returns 0.0 for a degenerate (near-zero-width) segment so that
/// extrapolation past a collapsed boundary stays finite.
#[must_use]
pub fn segment_slope(xs: &[f64], ys: &[f64], i: usize) -> f64 {
    let dx = xs[i + 1] - xs[i];
    if dx.abs() < f64::EPSILON {
        0.0
    } else {
        (ys[i + 1] - ys[i]) / dx
    }
}

/// Evaluates the piecewise-linear curve `(xs, ys)` at `x`.
///
/// `xs` must be sorted ascending and both slices must have the same
/// length, at least 2. Values of `x` at a sample point return the stored
/// ordinate exactly; values beyond either end follow the boundary
/// segment's slope.
#[must_use]
pub fn linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    debug_assert!(xs.len() >= 2);

    let n = xs.len();
    if x <= xs[0] {
        return ys[0] + segment_slope(xs, ys, 0) * (x - xs[0]);
    }
    if x >= xs[n - 1] {
        return ys[n - 1] + segment_slope(xs, ys, n - 2) * (x - xs[n - 1]);
    }

    // partition_point returns the first index with xs[i] >= x, which is
    // at least 1 here because x > xs[0].
    let hi = xs.partition_point(|&v| v < x);
    let lo = hi - 1;
    ys[lo] + segment_slope(xs, ys, lo) * (x - xs[lo])
}
