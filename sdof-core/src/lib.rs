//! Leaf data structures for single-degree-of-freedom structural dynamics:
//! a piecewise-linear hysteretic [`BackboneCurve`] and a sampled
//! [`ForceCurve`], both consumed by the Newmark integrator in `sdof-solve`.

pub mod backbone;
pub mod force;
pub mod interp;

pub use backbone::{BackboneCurve, BackboneError, BackbonePoint, BackboneState};
pub use force::{ForceCurve, ForceError};
