use thiserror::Error;

/// Errors raised while building or querying a backbone curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BackboneError {
    #[error("inbound branch has no points")]
    EmptyInbound,

    #[error("rebound branch has no points")]
    EmptyRebound,

    #[error("inbound displacements must be positive and strictly increasing")]
    UnorderedInbound,

    #[error("rebound displacements must be negative and strictly decreasing")]
    UnorderedRebound,

    #[error("displacement and resistance arrays differ in length: {displacements} vs {resistances}")]
    LengthMismatch {
        displacements: usize,
        resistances: usize,
    },

    #[error("region {0} has no backbone segment")]
    RegionNotFound(i32),

    #[error("elastic segment in region {0} has zero stiffness; cannot re-anchor the curve")]
    DegenerateElasticSegment(i32),
}
