/// The full time-history output of one integration run.
///
/// All vectors have identical length `floor(total_time / dt) + 1`; index
/// `i` holds the state of the system at `time[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Sample times, `time[i] = i * dt`.
    pub time: Vec<f64>,
    /// Displacement history.
    pub displacement: Vec<f64>,
    /// Velocity history.
    pub velocity: Vec<f64>,
    /// Acceleration history.
    pub acceleration: Vec<f64>,
    /// Tangent stiffness of the backbone region occupied at each step.
    pub stiffness: Vec<f64>,
    /// Restoring force drawn from the backbone at each step.
    pub restoring_force: Vec<f64>,
    /// External force applied at each step (discretized force curve).
    pub applied_force: Vec<f64>,
}

impl Response {
    /// Number of recorded time steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.time.len()
    }
}
