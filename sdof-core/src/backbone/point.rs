use serde::{Deserialize, Serialize};

/// One control point of a backbone branch.
///
/// Within a branch, displacements must march strictly away from the
/// origin in order of increasing magnitude. The mass-participation
/// factor `klm` defaults to 1.0 when omitted from serialized input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackbonePoint {
    pub displacement: f64,
    pub resistance: f64,
    #[serde(default = "default_klm")]
    pub klm: f64,
}

fn default_klm() -> f64 {
    1.0
}

impl BackbonePoint {
    /// A control point with the default mass participation of 1.0.
    #[must_use]
    pub fn new(displacement: f64, resistance: f64) -> Self {
        Self::with_klm(displacement, resistance, default_klm())
    }

    /// A control point with an explicit mass-participation factor.
    #[must_use]
    pub fn with_klm(displacement: f64, resistance: f64, klm: f64) -> Self {
        Self {
            displacement,
            resistance,
            klm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn klm_defaults_to_one() {
        let point = BackbonePoint::new(0.5, 4.0);
        assert_eq!(point.klm, 1.0);
    }
}
