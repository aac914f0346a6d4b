//! The piecewise-linear hysteretic backbone curve.
//!
//! A backbone curve describes a structural element's resistance as a
//! function of displacement. It is built from two independent branches —
//! "inbound" on the positive side of the origin and "rebound" on the
//! negative side — which are merged through an explicit origin pivot
//! into one sorted displacement axis.
//!
//! The curve definition ([`BackboneCurve`]) is immutable and shareable.
//! Everything that changes during a simulation run — which linear region
//! the displacement currently occupies and the horizontal offset applied
//! by the pivot hysteresis rule — lives in a small [`BackboneState`]
//! value that the integrator threads through its step loop. One curve
//! definition can therefore back any number of independent runs, each
//! owning its own state.

mod error;
mod point;
mod state;

pub use error::BackboneError;
pub use point::BackbonePoint;
pub use state::BackboneState;

use crate::interp;

/// Factor applied to a branch's farthest displacement to place the
/// synthetic plateau extension point, guaranteeing safe extrapolation.
const EXTENSION_FACTOR: f64 = 1.2;

/// Secant stiffness and mass-participation factor of one merged segment.
#[derive(Debug, Clone, Copy)]
struct Segment {
    stiffness: f64,
    klm: f64,
}

/// An asymmetric, piecewise-linear resistance-vs-displacement relation.
///
/// Regions are keyed by a signed integer offset from the origin pivot:
/// region `1` is the first segment on the inbound (positive) side,
/// region `-1` the first on the rebound (negative) side, and so on
/// outward. Region `0` is never a valid segment key.
#[derive(Debug, Clone)]
pub struct BackboneCurve {
    /// Merged displacement values, sorted ascending, unshifted.
    xs: Vec<f64>,
    /// Merged resistance values, parallel to `xs`.
    ys: Vec<f64>,
    /// Index of the origin pivot within the merged arrays.
    mid: usize,
    /// Per-segment records, `segments[i]` spanning `xs[i]..xs[i + 1]`.
    segments: Vec<Segment>,
}

impl BackboneCurve {
    /// Builds a curve from independent inbound and rebound branches.
    ///
    /// Each branch is extended with a synthetic point 20% beyond its
    /// farthest displacement at the same resistance (a flat plateau), so
    /// a single-point branch is acceptable. The branches are then merged
    /// with an explicit origin point into one sorted displacement axis.
    ///
    /// # Errors
    ///
    /// Returns an error if either branch is empty, if inbound
    /// displacements are not positive and strictly increasing, or if
    /// rebound displacements are not negative and strictly decreasing.
    pub fn new(
        inbound: Vec<BackbonePoint>,
        rebound: Vec<BackbonePoint>,
    ) -> Result<Self, BackboneError> {
        if inbound.is_empty() {
            return Err(BackboneError::EmptyInbound);
        }
        if rebound.is_empty() {
            return Err(BackboneError::EmptyRebound);
        }
        if !is_ordered_away_from_origin(&inbound, 1.0) {
            return Err(BackboneError::UnorderedInbound);
        }
        if !is_ordered_away_from_origin(&rebound, -1.0) {
            return Err(BackboneError::UnorderedRebound);
        }

        let inbound = extend_branch(inbound);
        let rebound = extend_branch(rebound);

        // Merge: rebound reversed (ascending), origin pivot, inbound.
        let n = rebound.len() + 1 + inbound.len();
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        let mut klms = Vec::with_capacity(n);
        for p in rebound.iter().rev() {
            xs.push(p.displacement);
            ys.push(p.resistance);
            klms.push(p.klm);
        }
        let mid = xs.len();
        xs.push(0.0);
        ys.push(0.0);
        klms.push(1.0);
        for p in &inbound {
            xs.push(p.displacement);
            ys.push(p.resistance);
            klms.push(p.klm);
        }

        // Each segment takes the klm of its endpoint farther from the
        // pivot: the branch point that defines the region.
        let segments = (0..n - 1)
            .map(|i| Segment {
                stiffness: interp::segment_slope(&xs, &ys, i),
                klm: if i >= mid { klms[i + 1] } else { klms[i] },
            })
            .collect();

        Ok(Self {
            xs,
            ys,
            mid,
            segments,
        })
    }

    /// Builds a symmetric curve from parallel positive-side arrays.
    ///
    /// The rebound branch mirrors the inbound branch through the origin;
    /// every point carries the same mass-participation factor `klm`.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as
    /// [`BackboneCurve::new`], or if the arrays differ in length.
    pub fn symmetric(
        displacements: &[f64],
        resistances: &[f64],
        klm: f64,
    ) -> Result<Self, BackboneError> {
        if displacements.len() != resistances.len() {
            return Err(BackboneError::LengthMismatch {
                displacements: displacements.len(),
                resistances: resistances.len(),
            });
        }
        let inbound: Vec<_> = displacements
            .iter()
            .zip(resistances)
            .map(|(&d, &r)| BackbonePoint::with_klm(d, r, klm))
            .collect();
        let rebound: Vec<_> = inbound
            .iter()
            .map(|p| BackbonePoint::with_klm(-p.displacement, -p.resistance, klm))
            .collect();
        Self::new(inbound, rebound)
    }

    /// A fresh, unshifted state anchored in the first inbound region.
    #[must_use]
    pub fn initial_state(&self) -> BackboneState {
        BackboneState {
            region: 1,
            shift: 0.0,
        }
    }

    /// Restores `state` to the original, unshifted configuration.
    pub fn reset(&self, state: &mut BackboneState) {
        *state = self.initial_state();
    }

    /// Merged displacement values (unshifted), sorted ascending.
    #[must_use]
    pub fn displacements(&self) -> &[f64] {
        &self.xs
    }

    /// Merged resistance values, parallel to
    /// [`BackboneCurve::displacements`].
    #[must_use]
    pub fn resistances(&self) -> &[f64] {
        &self.ys
    }

    /// Index of the origin pivot within the merged arrays.
    #[must_use]
    pub fn mid_index(&self) -> usize {
        self.mid
    }

    /// Current pivot displacement, including the hysteresis shift.
    #[must_use]
    pub fn pivot(&self, state: &BackboneState) -> f64 {
        self.xs[self.mid] + state.shift
    }

    /// Minimum and maximum resistance anywhere on the curve.
    #[must_use]
    pub fn resistance_range(&self) -> (f64, f64) {
        self.ys
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| {
                (lo.min(y), hi.max(y))
            })
    }

    /// Secant stiffness of the first inbound segment.
    #[must_use]
    pub fn inbound_elastic_stiffness(&self) -> f64 {
        self.segments[self.mid].stiffness
    }

    /// Secant stiffness of the first rebound segment.
    #[must_use]
    pub fn rebound_elastic_stiffness(&self) -> f64 {
        self.segments[self.mid - 1].stiffness
    }

    /// Resistance at `displacement` on the shifted curve.
    ///
    /// The hysteresis shift translates the whole displacement axis, so
    /// the lookup subtracts it and interpolates the original arrays,
    /// extrapolating past either end along the boundary segment's slope.
    #[must_use]
    pub fn resistance_at(&self, state: &BackboneState, displacement: f64) -> f64 {
        interp::linear(&self.xs, &self.ys, displacement - state.shift)
    }

    /// Re-locates the region occupied by `displacement` and records it
    /// in `state`, returning the new signed region.
    ///
    /// Walks outward from the pivot rather than binary searching:
    /// between consecutive time steps the region is expected to change
    /// by at most one, so the walk terminates almost immediately. A
    /// displacement beyond the outermost breakpoint reports the
    /// outermost region on that side.
    pub fn update_region(&self, state: &mut BackboneState, displacement: f64) -> i32 {
        let q = displacement - state.shift;
        let region = if q >= self.xs[self.mid] {
            let mut r = 0;
            for i in self.mid..self.xs.len() - 1 {
                r += 1;
                if q <= self.xs[i + 1] {
                    break;
                }
            }
            r
        } else {
            let mut r = 0;
            for i in (1..=self.mid).rev() {
                r -= 1;
                if q >= self.xs[i - 1] {
                    break;
                }
            }
            r
        };
        state.region = region;
        region
    }

    /// Secant stiffness of the given signed region.
    ///
    /// A degenerate (near-zero-width) segment reports zero stiffness.
    ///
    /// # Errors
    ///
    /// Returns [`BackboneError::RegionNotFound`] if `region` does not
    /// key a segment.
    pub fn stiffness_in_region(&self, region: i32) -> Result<f64, BackboneError> {
        self.segment(region).map(|s| s.stiffness)
    }

    /// Mass-participation factor of the given signed region.
    ///
    /// # Errors
    ///
    /// Returns [`BackboneError::RegionNotFound`] if `region` does not
    /// key a segment.
    pub fn klm_in_region(&self, region: i32) -> Result<f64, BackboneError> {
        self.segment(region).map(|s| s.klm)
    }

    /// Re-anchors the curve through `displacement` on a load reversal.
    ///
    /// The pivot hysteresis rule: the whole displacement axis is
    /// translated so that unloading from the reversal point follows the
    /// elastic stiffness of whichever branch the point lies on — inbound
    /// if `displacement` is at or beyond the current pivot, rebound
    /// otherwise. Subsequent loading in the new direction retraces the
    /// original branch shape, offset to pass through the reversal point.
    ///
    /// # Errors
    ///
    /// Returns [`BackboneError::DegenerateElasticSegment`] if the
    /// selected elastic segment has zero stiffness, which would make the
    /// re-anchoring offset unbounded.
    pub fn shift_to(
        &self,
        state: &mut BackboneState,
        displacement: f64,
    ) -> Result<(), BackboneError> {
        let branch = if displacement >= self.pivot(state) { 1 } else { -1 };
        let elastic = self.stiffness_in_region(branch)?;
        if elastic.abs() < f64::EPSILON {
            return Err(BackboneError::DegenerateElasticSegment(branch));
        }
        let resistance = self.resistance_at(state, displacement);
        state.shift += displacement - resistance / elastic - self.pivot(state);
        Ok(())
    }

    fn segment(&self, region: i32) -> Result<&Segment, BackboneError> {
        let idx = if region > 0 {
            self.mid as i64 + i64::from(region) - 1
        } else if region < 0 {
            self.mid as i64 + i64::from(region)
        } else {
            return Err(BackboneError::RegionNotFound(0));
        };
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.segments.get(i))
            .ok_or(BackboneError::RegionNotFound(region))
    }
}

/// Checks that branch displacements march strictly away from the origin
/// on the side given by `sign` (+1 inbound, -1 rebound).
fn is_ordered_away_from_origin(points: &[BackbonePoint], sign: f64) -> bool {
    let mut previous = 0.0;
    points.iter().all(|p| {
        let d = p.displacement * sign;
        let ok = d > previous;
        previous = d;
        ok
    })
}

/// Appends the synthetic plateau point 20% beyond the farthest
/// displacement, at the same resistance and klm.
fn extend_branch(mut points: Vec<BackbonePoint>) -> Vec<BackbonePoint> {
    let last = points[points.len() - 1];
    points.push(BackbonePoint::with_klm(
        last.displacement * EXTENSION_FACTOR,
        last.resistance,
        last.klm,
    ));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// The elastic-perfectly-plastic curve from the validation scenario:
    /// yield at ±0.75 with resistance ±7.5.
    fn yielding_curve() -> BackboneCurve {
        BackboneCurve::new(
            vec![BackbonePoint::new(0.75, 7.5)],
            vec![BackbonePoint::new(-0.75, -7.5)],
        )
        .unwrap()
    }

    #[test]
    fn merges_branches_with_plateau_extensions() {
        let curve = yielding_curve();
        let extended = 0.75 * EXTENSION_FACTOR;
        assert_eq!(
            curve.displacements(),
            &[-extended, -0.75, 0.0, 0.75, extended]
        );
        assert_eq!(curve.resistances(), &[-7.5, -7.5, 0.0, 7.5, 7.5]);
        assert_eq!(curve.mid_index(), 2);
    }

    #[test]
    fn region_stiffness_reflects_segments() {
        let curve = yielding_curve();
        assert_relative_eq!(curve.stiffness_in_region(1).unwrap(), 10.0);
        assert_relative_eq!(curve.stiffness_in_region(-1).unwrap(), 10.0);
        assert_relative_eq!(curve.stiffness_in_region(2).unwrap(), 0.0);
        assert_relative_eq!(curve.stiffness_in_region(-2).unwrap(), 0.0);
        assert_relative_eq!(curve.inbound_elastic_stiffness(), 10.0);
        assert_relative_eq!(curve.rebound_elastic_stiffness(), 10.0);
    }

    #[test]
    fn rejects_empty_branches() {
        let inbound = vec![BackbonePoint::new(1.0, 5.0)];
        assert!(matches!(
            BackboneCurve::new(Vec::new(), inbound.clone()),
            Err(BackboneError::EmptyInbound)
        ));
        assert!(matches!(
            BackboneCurve::new(inbound, Vec::new()),
            Err(BackboneError::EmptyRebound)
        ));
    }

    #[test]
    fn rejects_unordered_branches() {
        let result = BackboneCurve::new(
            vec![BackbonePoint::new(1.0, 5.0), BackbonePoint::new(0.5, 6.0)],
            vec![BackbonePoint::new(-1.0, -5.0)],
        );
        assert!(matches!(result, Err(BackboneError::UnorderedInbound)));

        let result = BackboneCurve::new(
            vec![BackbonePoint::new(1.0, 5.0)],
            vec![BackbonePoint::new(0.5, -5.0)],
        );
        assert!(matches!(result, Err(BackboneError::UnorderedRebound)));
    }

    #[test]
    fn symmetric_mirrors_the_positive_branch() {
        let curve = BackboneCurve::symmetric(&[0.75], &[7.5], 1.0).unwrap();
        let reference = yielding_curve();
        assert_eq!(curve.displacements(), reference.displacements());
        assert_eq!(curve.resistances(), reference.resistances());
    }

    #[test]
    fn resistance_matches_control_points_exactly() {
        let curve = yielding_curve();
        let state = curve.initial_state();
        for (x, y) in curve
            .displacements()
            .iter()
            .zip(curve.resistances().iter())
        {
            assert_relative_eq!(curve.resistance_at(&state, *x), *y);
        }
    }

    #[test]
    fn extrapolates_along_the_plateau() {
        let curve = yielding_curve();
        let state = curve.initial_state();
        assert_relative_eq!(curve.resistance_at(&state, 3.0), 7.5);
        assert_relative_eq!(curve.resistance_at(&state, -3.0), -7.5);
    }

    #[test]
    fn region_walk_is_monotonic_for_monotonic_probes() {
        let curve = yielding_curve();
        let mut state = curve.initial_state();

        let mut previous = i32::MIN;
        let mut probe = -1.0;
        while probe <= 1.0 {
            let region = curve.update_region(&mut state, probe);
            assert!(region >= previous, "region regressed at probe {probe}");
            previous = region;
            probe += 0.05;
        }

        let mut previous = i32::MAX;
        let mut probe = 1.0;
        while probe >= -1.0 {
            let region = curve.update_region(&mut state, probe);
            assert!(region <= previous, "region regressed at probe {probe}");
            previous = region;
            probe -= 0.05;
        }
    }

    #[test]
    fn probes_beyond_the_curve_report_the_outermost_region() {
        let curve = yielding_curve();
        let mut state = curve.initial_state();
        assert_eq!(curve.update_region(&mut state, 5.0), 2);
        assert_eq!(curve.update_region(&mut state, -5.0), -2);
    }

    #[test]
    fn region_zero_and_out_of_range_regions_are_rejected() {
        let curve = yielding_curve();
        assert!(matches!(
            curve.stiffness_in_region(0),
            Err(BackboneError::RegionNotFound(0))
        ));
        assert!(matches!(
            curve.klm_in_region(7),
            Err(BackboneError::RegionNotFound(7))
        ));
        assert!(matches!(
            curve.klm_in_region(-7),
            Err(BackboneError::RegionNotFound(-7))
        ));
    }

    #[test]
    fn klm_follows_the_defining_branch_point() {
        let curve = BackboneCurve::new(
            vec![
                BackbonePoint::with_klm(0.5, 5.0, 0.78),
                BackbonePoint::with_klm(1.5, 6.0, 0.66),
            ],
            vec![BackbonePoint::with_klm(-0.5, -5.0, 0.78)],
        )
        .unwrap();
        assert_relative_eq!(curve.klm_in_region(1).unwrap(), 0.78);
        assert_relative_eq!(curve.klm_in_region(2).unwrap(), 0.66);
        // Extension segment inherits the farthest point's klm.
        assert_relative_eq!(curve.klm_in_region(3).unwrap(), 0.66);
        assert_relative_eq!(curve.klm_in_region(-1).unwrap(), 0.78);
    }

    #[test]
    fn shift_re_anchors_through_the_reversal_point() {
        let curve = yielding_curve();
        let mut state = curve.initial_state();

        // Reversal deep in the inbound plateau at u = 1.92, where the
        // resistance is 7.5 and the inbound elastic stiffness is 10:
        // shift = 1.92 - 7.5/10 - 0 = 1.17.
        curve.shift_to(&mut state, 1.92).unwrap();
        assert_relative_eq!(state.shift, 1.17, epsilon = 1e-12);
        assert_relative_eq!(curve.pivot(&state), 1.17, epsilon = 1e-12);

        // The shifted curve passes through the reversal point and
        // unloads along the elastic stiffness toward the new pivot.
        assert_relative_eq!(curve.resistance_at(&state, 1.92), 7.5, epsilon = 1e-12);
        assert_relative_eq!(curve.resistance_at(&state, 1.82), 6.5, epsilon = 1e-12);
        assert_relative_eq!(curve.resistance_at(&state, 1.17), 0.0, epsilon = 1e-12);

        // The reversal point now sits in the elastic region again.
        assert_eq!(curve.update_region(&mut state, 1.92), 1);
    }

    #[test]
    fn shift_uses_the_rebound_branch_below_the_pivot() {
        let curve = yielding_curve();
        let mut state = curve.initial_state();

        curve.shift_to(&mut state, -1.3).unwrap();
        // shift = -1.3 - (-7.5)/10 - 0 = -0.55.
        assert_relative_eq!(state.shift, -0.55, epsilon = 1e-12);
        assert_relative_eq!(curve.resistance_at(&state, -1.3), -7.5, epsilon = 1e-12);
        assert_relative_eq!(curve.resistance_at(&state, -0.55), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn shift_rejects_a_zero_stiffness_elastic_segment() {
        // Flat inbound branch straight from the origin.
        let curve = BackboneCurve::new(
            vec![BackbonePoint::new(1.0, 0.0)],
            vec![BackbonePoint::new(-1.0, -5.0)],
        )
        .unwrap();
        let mut state = curve.initial_state();
        assert!(matches!(
            curve.shift_to(&mut state, 0.5),
            Err(BackboneError::DegenerateElasticSegment(1))
        ));
    }

    #[test]
    fn reset_restores_the_unshifted_state() {
        let curve = yielding_curve();
        let mut state = curve.initial_state();
        curve.shift_to(&mut state, 1.92).unwrap();
        curve.update_region(&mut state, 1.92);

        curve.reset(&mut state);
        assert_eq!(state, curve.initial_state());
        assert_relative_eq!(curve.pivot(&state), 0.0);
    }

    #[test]
    fn independent_states_do_not_interfere() {
        let curve = yielding_curve();
        let mut first = curve.initial_state();
        let mut second = curve.initial_state();

        curve.shift_to(&mut first, 1.92).unwrap();
        curve.update_region(&mut second, -0.8);

        assert_relative_eq!(first.shift, 1.17, epsilon = 1e-12);
        assert_relative_eq!(second.shift, 0.0);
        assert_eq!(second.region, -2);
        // The shared definition still answers unshifted queries for the
        // untouched state.
        assert_relative_eq!(curve.resistance_at(&second, 0.5), 5.0);
    }
}
