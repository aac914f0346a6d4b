//! Implicit Newmark-beta time integration with per-step Newton-Raphson
//! equilibrium iteration against a hysteretic backbone curve.
//!
//! Each step solves the incremental equation of motion
//!
//! ```text
//!   m_eff·ü + c·u̇ + f_s(u) = p(t) + f_gravity
//! ```
//!
//! where `f_s` is the backbone's piecewise-linear restoring force, the
//! effective mass `m_eff` follows the backbone region's mass
//! participation, and a velocity sign reversal re-anchors the backbone
//! through the reversal point (pivot hysteresis).
//!
//! Non-convergence of the equilibrium iteration is a hard failure:
//! exceeding the iteration cap aborts the whole run with
//! [`Error::NonConvergence`] rather than silently keeping the last
//! iterate, since an unconverged step corrupts every later sample
//! without signal.

mod config;
mod error;
mod response;

pub use config::{AUTO_PERIOD_FRACTION, Config, TimeStep};
pub use error::Error;
pub use response::Response;

use serde::{Deserialize, Serialize};

use sdof_core::{BackboneCurve, ForceCurve};

/// Effective masses with magnitude below this abort the run.
const EFFECTIVE_MASS_EPS: f64 = 1e-12;

/// Effective tangent stiffnesses with magnitude below this stall the
/// Newton update; the step is reported as non-convergent instead of
/// dividing by a vanishing denominator.
const TANGENT_STIFFNESS_EPS: f64 = 1e-9;

/// Physical description of the SDOF system outside the backbone curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct System {
    /// Base mass.
    pub mass: f64,
    /// Damping ratio ζ as a fraction of critical damping.
    pub damping_ratio: f64,
    /// Global mass-participation scale, multiplied with the backbone
    /// region's own klm.
    pub klm_scale: f64,
    /// Optional constant gravity bias.
    pub gravity: Option<Gravity>,
}

impl System {
    /// A system with unit mass participation and no gravity bias.
    #[must_use]
    pub fn new(mass: f64, damping_ratio: f64) -> Self {
        Self {
            mass,
            damping_ratio,
            klm_scale: 1.0,
            gravity: None,
        }
    }

    /// Sets the global mass-participation scale.
    #[must_use]
    pub fn with_klm_scale(mut self, klm_scale: f64) -> Self {
        self.klm_scale = klm_scale;
        self
    }

    /// Enables the constant gravity bias.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }
}

/// Constant gravity bias: the dead weight adds to the oscillating mass
/// and the combined weight preloads the backbone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Additional dead weight carried by the system.
    pub added_weight: f64,
    /// Gravitational acceleration constant.
    pub constant: f64,
}

/// Initial displacement and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InitialConditions {
    #[serde(default)]
    pub displacement: f64,
    #[serde(default)]
    pub velocity: f64,
}

/// Runs the full time integration and returns the response histories.
///
/// The backbone curve definition is read-only; all hysteresis state for
/// this run lives in a locally owned
/// [`BackboneState`](sdof_core::BackboneState), so one curve definition
/// can serve concurrent runs.
///
/// # Errors
///
/// Returns an error before any stepping for an invalid configuration, a
/// near-zero effective mass, or a gravity preload beyond the backbone's
/// capacity; during stepping only for equilibrium non-convergence
/// ([`Error::NonConvergence`]).
pub fn solve(
    system: &System,
    backbone: &BackboneCurve,
    force: &ForceCurve,
    initial: InitialConditions,
    config: &Config,
) -> Result<Response, Error> {
    config
        .validate()
        .map_err(|reason| Error::InvalidConfig { reason })?;

    let k0 = backbone.inbound_elastic_stiffness();
    let (mass, gravity_force) = match system.gravity {
        Some(g) => {
            let m = system.mass + g.added_weight;
            (m, m * g.constant)
        }
        None => (system.mass, 0.0),
    };

    let dt = match config.time_step {
        TimeStep::Fixed(dt) => dt,
        TimeStep::Auto => {
            if k0.abs() < f64::EPSILON {
                return Err(Error::InvalidConfig {
                    reason: "automatic time step requires a nonzero inbound elastic stiffness",
                });
            }
            let natural_period = std::f64::consts::TAU * (mass / k0).abs().sqrt();
            AUTO_PERIOD_FRACTION * natural_period
        }
    };
    let steps = (config.total_time / dt).floor() as usize + 1;
    let (time, applied) = force.discretize(steps, dt)?;

    let u0 = if gravity_force == 0.0 {
        initial.displacement
    } else {
        let (lowest, highest) = backbone.resistance_range();
        let capacity = if gravity_force >= 0.0 {
            highest
        } else {
            lowest.abs()
        };
        if gravity_force.abs() > capacity {
            return Err(Error::GravityExceedsCapacity {
                preload: gravity_force,
                capacity,
            });
        }
        initial.displacement + gravity_force / k0
    };

    let mut state = backbone.initial_state();
    let region = backbone.update_region(&mut state, u0);

    let mut klm = system.klm_scale * backbone.klm_in_region(region)?;
    let mut m_eff = klm * mass;
    if m_eff.abs() < EFFECTIVE_MASS_EPS {
        return Err(Error::NonPositiveEffectiveMass { mass: m_eff });
    }
    let zeta = system.damping_ratio;
    let mut c_damp = damping_coefficient(zeta, m_eff, k0);
    let (mut a1, mut a2, mut a3) = coefficients(m_eff, c_damp, config, dt);

    let mut u = vec![0.0; steps];
    let mut v = vec![0.0; steps];
    let mut a = vec![0.0; steps];
    let mut stiffness = vec![0.0; steps];
    let mut restoring = vec![0.0; steps];

    u[0] = u0;
    v[0] = initial.velocity;
    let mut fs = backbone.resistance_at(&state, u[0]);
    let mut kt = backbone.stiffness_in_region(state.region)?;
    a[0] = (applied[0] - c_damp * v[0] - fs + gravity_force) / m_eff;
    stiffness[0] = kt;
    restoring[0] = fs;

    let tol_squared = config.residual_tol * config.residual_tol;

    for i in 0..steps - 1 {
        // Predictor: fold the known state into an effective load.
        let p_hat = applied[i + 1] + a1 * u[i] + a2 * v[i] + a3 * a[i] + gravity_force;

        // Newton-Raphson equilibrium iteration, seeded at the previous
        // displacement.
        let mut u_next = u[i];
        backbone.update_region(&mut state, u_next);
        fs = backbone.resistance_at(&state, u_next);
        kt = backbone.stiffness_in_region(state.region)?;

        let mut residual = p_hat - fs - a1 * u_next;
        let mut converged = residual * residual < tol_squared;
        let mut iterations = 0;
        while !converged && iterations < config.max_iters {
            // A softening segment can cancel a1 almost exactly; bail out
            // with the last finite residual rather than divide by it.
            let kt_hat = kt + a1;
            if kt_hat.abs() < TANGENT_STIFFNESS_EPS {
                break;
            }
            u_next += residual / kt_hat;
            backbone.update_region(&mut state, u_next);
            fs = backbone.resistance_at(&state, u_next);
            kt = backbone.stiffness_in_region(state.region)?;
            iterations += 1;
            residual = p_hat - fs - a1 * u_next;
            converged = residual * residual < tol_squared;
        }
        if !converged {
            return Err(Error::NonConvergence {
                step: i + 1,
                iterations,
                residual,
            });
        }

        u[i + 1] = u_next;
        v[i + 1] = config.gamma / (config.beta * dt) * (u_next - u[i])
            + (1.0 - config.gamma / config.beta) * v[i]
            + dt * (1.0 - config.gamma / (2.0 * config.beta)) * a[i];
        a[i + 1] = (u_next - u[i]) / (config.beta * dt * dt)
            - v[i] / (config.beta * dt)
            - (1.0 / (2.0 * config.beta) - 1.0) * a[i];

        // A velocity sign reversal re-anchors the backbone through the
        // reversal point.
        if i > 0 && v[i] * v[i + 1] < 0.0 {
            backbone.shift_to(&mut state, u_next)?;
            backbone.update_region(&mut state, u_next);
            fs = backbone.resistance_at(&state, u_next);
            kt = backbone.stiffness_in_region(state.region)?;
        }

        stiffness[i + 1] = kt;
        restoring[i + 1] = fs;

        // A region change can bring a different mass participation;
        // refresh the Newmark coefficients before the next step.
        let region_klm = system.klm_scale * backbone.klm_in_region(state.region)?;
        if (region_klm - klm).abs() > f64::EPSILON {
            klm = region_klm;
            m_eff = klm * mass;
            if m_eff.abs() < EFFECTIVE_MASS_EPS {
                return Err(Error::NonPositiveEffectiveMass { mass: m_eff });
            }
            c_damp = damping_coefficient(zeta, m_eff, k0);
            (a1, a2, a3) = coefficients(m_eff, c_damp, config, dt);
        }
    }

    Ok(Response {
        time,
        displacement: u,
        velocity: v,
        acceleration: a,
        stiffness,
        restoring_force: restoring,
        applied_force: applied,
    })
}

/// Viscous damping coefficient `2ζ·sqrt(m_eff·k0)`, preserving the sign
/// of the product when `m_eff·k0` is negative.
fn damping_coefficient(zeta: f64, m_eff: f64, k0: f64) -> f64 {
    let product = m_eff * k0;
    2.0 * zeta * product.abs().sqrt().copysign(product)
}

/// The three Newmark predictor coefficients for the current effective
/// mass and damping.
fn coefficients(m_eff: f64, c_damp: f64, config: &Config, dt: f64) -> (f64, f64, f64) {
    let gamma = config.gamma;
    let beta = config.beta;
    let a1 = m_eff / (beta * dt * dt) + c_damp * gamma / (beta * dt);
    let a2 = m_eff / (beta * dt) - c_damp * (1.0 - gamma / beta);
    let a3 = m_eff * (1.0 / (2.0 * beta) - 1.0) - c_damp * dt * (1.0 - gamma / (2.0 * beta));
    (a1, a2, a3)
}
