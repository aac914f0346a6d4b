//! The single request/response unit of work around one solver run.
//!
//! A collaborator (worker, queue consumer, RPC handler) hands [`run`]
//! one [`SimulationRequest`] payload and receives exactly one
//! [`SimulationOutcome`]: either the full response histories with the
//! measured runtime, or a structured failure message. Every solver and
//! curve error is converted at this boundary; nothing escapes as a
//! panic, and a failed run is never retried here — resubmission is the
//! caller's decision.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use sdof_core::{BackboneCurve, BackbonePoint, ForceCurve};

use crate::newmark::{self, Config, Gravity, InitialConditions, System, TimeStep};

/// Input payload for one solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Base mass, must be positive.
    pub mass: f64,
    /// Global mass-participation scale; defaults to 1.0.
    #[serde(default = "default_klm")]
    pub klm: f64,
    /// Resistance-vs-displacement definition.
    pub backbone: BackboneDefinition,
    /// Damping ratio as a fraction of critical damping.
    pub damping_ratio: f64,
    /// Force sample times, strictly increasing, parallel to `force`.
    pub time: Vec<f64>,
    /// Force samples.
    pub force: Vec<f64>,
    /// Initial displacement and velocity; defaults to rest.
    #[serde(default)]
    pub initial: InitialConditions,
    /// Time stepping settings.
    pub settings: SolverSettings,
    /// Optional constant gravity bias.
    #[serde(default)]
    pub gravity: Option<GravitySettings>,
}

fn default_klm() -> f64 {
    1.0
}

/// The two accepted backbone wire forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackboneDefinition {
    /// Positive-side arrays mirrored through the origin.
    Symmetric {
        displacement: Vec<f64>,
        resistance: Vec<f64>,
    },
    /// Independent branch point lists, possibly asymmetric.
    Branches {
        inbound: Vec<BackbonePoint>,
        rebound: Vec<BackbonePoint>,
    },
}

/// Total time and step selection for one run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Total simulated time.
    pub total_time: f64,
    /// Fixed time step; required unless `auto` is set.
    #[serde(default)]
    pub dt: Option<f64>,
    /// Derive the time step from the natural period instead.
    #[serde(default)]
    pub auto: bool,
}

/// Gravity bias settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GravitySettings {
    /// Additional dead weight carried by the system.
    #[serde(default)]
    pub added_weight: f64,
    /// Gravitational acceleration constant.
    pub constant: f64,
}

/// Result payload: one success or one failure per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationOutcome {
    Success(SimulationResult),
    Failure { error_message: String },
}

/// The response histories plus the measured solver runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub time: Vec<f64>,
    pub displacement: Vec<f64>,
    pub velocity: Vec<f64>,
    pub acceleration: Vec<f64>,
    pub stiffness: Vec<f64>,
    pub restoring_force: Vec<f64>,
    pub applied_force: Vec<f64>,
    pub runtime_ms: f64,
}

/// Executes one simulation request to completion.
///
/// Always returns an outcome; construction, configuration, and
/// iteration errors all surface as [`SimulationOutcome::Failure`] with a
/// human-readable message.
#[must_use]
pub fn run(request: SimulationRequest) -> SimulationOutcome {
    let started = Instant::now();
    match execute(request) {
        Ok(response) => SimulationOutcome::Success(SimulationResult {
            time: response.time,
            displacement: response.displacement,
            velocity: response.velocity,
            acceleration: response.acceleration,
            stiffness: response.stiffness,
            restoring_force: response.restoring_force,
            applied_force: response.applied_force,
            runtime_ms: started.elapsed().as_secs_f64() * 1e3,
        }),
        Err(error_message) => SimulationOutcome::Failure { error_message },
    }
}

fn execute(request: SimulationRequest) -> Result<newmark::Response, String> {
    if !request.mass.is_finite() || request.mass <= 0.0 {
        return Err(format!("mass must be positive, got {}", request.mass));
    }

    let backbone = match request.backbone {
        BackboneDefinition::Symmetric {
            displacement,
            resistance,
        } => BackboneCurve::symmetric(&displacement, &resistance, 1.0),
        BackboneDefinition::Branches { inbound, rebound } => {
            BackboneCurve::new(inbound, rebound)
        }
    }
    .map_err(|e| e.to_string())?;

    let force = ForceCurve::new(request.time, request.force).map_err(|e| e.to_string())?;

    let time_step = if request.settings.auto {
        TimeStep::Auto
    } else {
        match request.settings.dt {
            Some(dt) => TimeStep::Fixed(dt),
            None => return Err("solver settings require either dt or auto".to_owned()),
        }
    };
    let config = Config {
        total_time: request.settings.total_time,
        time_step,
        ..Config::default()
    };

    let mut system =
        System::new(request.mass, request.damping_ratio).with_klm_scale(request.klm);
    if let Some(g) = request.gravity {
        system = system.with_gravity(Gravity {
            added_weight: g.added_weight,
            constant: g.constant,
        });
    }

    newmark::solve(&system, &backbone, &force, request.initial, &config).map_err(|e| e.to_string())
}
