/// Fraction of the natural period used for the automatic time step.
pub const AUTO_PERIOD_FRACTION: f64 = 1.0 / 100.0;

/// How the integration time step is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeStep {
    /// Derive the step from the system's natural period:
    /// `dt = AUTO_PERIOD_FRACTION * 2π * sqrt(m / k_inbound)`.
    Auto,
    /// Use the given step directly. Must be positive and finite.
    Fixed(f64),
}

/// Configuration for the Newmark solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Total simulated time. The run produces
    /// `floor(total_time / dt) + 1` samples.
    pub total_time: f64,
    /// Time step selection.
    pub time_step: TimeStep,
    /// Newmark velocity parameter.
    pub gamma: f64,
    /// Newmark acceleration parameter.
    pub beta: f64,
    /// Cap on Newton-Raphson iterations per time step.
    pub max_iters: usize,
    /// Equilibrium residual tolerance; converged when `r² < tol²`.
    pub residual_tol: f64,
}

impl Default for Config {
    /// One simulated second with an automatic step and the
    /// unconditionally stable average-acceleration parameters
    /// (γ = 1/2, β = 1/4).
    fn default() -> Self {
        Self {
            total_time: 1.0,
            time_step: TimeStep::Auto,
            gamma: 0.5,
            beta: 0.25,
            max_iters: 20,
            residual_tol: 1e-3,
        }
    }
}

impl Config {
    /// Average-acceleration config with a caller-supplied time step.
    #[must_use]
    pub fn fixed(total_time: f64, dt: f64) -> Self {
        Self {
            total_time,
            time_step: TimeStep::Fixed(dt),
            ..Self::default()
        }
    }

    /// Average-acceleration config with an automatic time step.
    #[must_use]
    pub fn auto(total_time: f64) -> Self {
        Self {
            total_time,
            time_step: TimeStep::Auto,
            ..Self::default()
        }
    }

    /// Validates the configuration before any stepping begins.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return Err("total_time must be finite and positive");
        }
        if let TimeStep::Fixed(dt) = self.time_step {
            if !dt.is_finite() || dt <= 0.0 {
                return Err("fixed time step must be finite and positive");
            }
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err("gamma must be finite and positive");
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err("beta must be finite and positive");
        }
        if !self.residual_tol.is_finite() || self.residual_tol <= 0.0 {
            return Err("residual_tol must be finite and positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_average_acceleration() {
        let config = Config::default();
        assert_eq!(config.gamma, 0.5);
        assert_eq!(config.beta, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_total_time() {
        let config = Config {
            total_time: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_fixed_step() {
        assert!(Config::fixed(1.0, 0.0).validate().is_err());
        assert!(Config::fixed(1.0, -0.1).validate().is_err());
        assert!(Config::fixed(1.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn rejects_degenerate_solver_knobs() {
        let config = Config {
            residual_tol: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            beta: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
