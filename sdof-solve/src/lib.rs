//! Newmark-beta time integration for single-degree-of-freedom nonlinear
//! structural dynamics.
//!
//! The [`newmark`] module drives the time-stepping loop: an implicit
//! Newmark-beta integrator coupled, at every step, to a Newton-Raphson
//! equilibrium iteration against a hysteretic backbone curve from
//! `sdof-core`. The [`request`] module wraps one full run as a single
//! request/response unit of work with serializable payloads.

pub mod newmark;
pub mod request;
