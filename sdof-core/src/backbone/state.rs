/// The per-run mutable part of a backbone curve.
///
/// A [`BackboneCurve`](super::BackboneCurve) definition never changes
/// after construction; everything the hysteresis rule mutates lives
/// here. The integrator owns one `BackboneState` per run and threads it
/// through every curve operation, so a single definition can back any
/// number of concurrent runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackboneState {
    /// Signed region the current displacement occupies: positive on the
    /// inbound side of the pivot, negative on the rebound side, never 0.
    pub region: i32,
    /// Uniform horizontal translation accumulated by pivot-shift
    /// hysteresis, applied to the displacement axis at lookup time.
    pub shift: f64,
}
