//! A sampled force time history with linear interpolation.

use ndarray::Array1;
use ninterp::{
    error::{InterpolateError, ValidateError},
    interpolator::Extrapolate,
    prelude::{Interp1DOwned, Interpolator},
    strategy::Linear,
};
use thiserror::Error;

/// Errors raised while building or querying a [`ForceCurve`].
#[derive(Debug, Error)]
pub enum ForceError {
    #[error("time and force arrays differ in length: {times} vs {forces}")]
    LengthMismatch { times: usize, forces: usize },

    #[error("force curve needs at least 2 samples, got {0}")]
    TooFewSamples(usize),

    #[error("discretization requires at least one step")]
    NoSteps,

    #[error("time step must be positive and finite, got {0}")]
    NonPositiveTimeStep(f64),

    #[error(transparent)]
    Validation(#[from] ValidateError),

    #[error(transparent)]
    Interpolation(#[from] InterpolateError),
}

/// An immutable force-vs-time sample set.
///
/// Lookups between samples interpolate linearly; lookups before the first
/// or after the last sample extrapolate along the boundary segment's
/// slope, with no clamping. Created once per simulation run and read-only
/// thereafter.
pub struct ForceCurve {
    times: Vec<f64>,
    forces: Vec<f64>,
    interp: Interp1DOwned<f64, Linear>,
}

impl ForceCurve {
    /// Builds a force curve from parallel time and force samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrays differ in length, hold fewer than
    /// 2 samples, or the times are not strictly increasing.
    pub fn new(times: Vec<f64>, forces: Vec<f64>) -> Result<Self, ForceError> {
        if times.len() != forces.len() {
            return Err(ForceError::LengthMismatch {
                times: times.len(),
                forces: forces.len(),
            });
        }
        if times.len() < 2 {
            return Err(ForceError::TooFewSamples(times.len()));
        }

        let interp = Interp1DOwned::new(
            Array1::from_vec(times.clone()).into(),
            Array1::from_vec(forces.clone()).into(),
            Linear,
            Extrapolate::Enable,
        )?;

        Ok(Self {
            times,
            forces,
            interp,
        })
    }

    /// The sampled time values, in increasing order.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The sampled force values, parallel to [`ForceCurve::times`].
    #[must_use]
    pub fn forces(&self) -> &[f64] {
        &self.forces
    }

    /// Interpolated force at time `t`, extrapolating beyond either end.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying interpolation fails, which for
    /// a finite `t` does not occur.
    pub fn get_at(&self, t: f64) -> Result<f64, ForceError> {
        self.interp.interpolate(&[t]).map_err(Into::into)
    }

    /// Samples the curve on the uniform grid `time[i] = i * dt`.
    ///
    /// Returns `(time, force)` vectors of length `steps`, interpolating
    /// each grid point with the same rule as [`ForceCurve::get_at`].
    ///
    /// # Errors
    ///
    /// Returns [`ForceError::NoSteps`] if `steps` is zero and
    /// [`ForceError::NonPositiveTimeStep`] if `dt` is not positive and
    /// finite.
    pub fn discretize(&self, steps: usize, dt: f64) -> Result<(Vec<f64>, Vec<f64>), ForceError> {
        if steps == 0 {
            return Err(ForceError::NoSteps);
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ForceError::NonPositiveTimeStep(dt));
        }

        let mut time = Vec::with_capacity(steps);
        let mut force = Vec::with_capacity(steps);
        for i in 0..steps {
            let t = i as f64 * dt;
            time.push(t);
            force.push(self.interp.interpolate(&[t])?);
        }
        Ok((time, force))
    }
}
