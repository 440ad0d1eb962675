//! Annealing parameters.

/// Configuration for the allocation search.
///
/// Defaults mirror the production service: 1000 draws starting at
/// temperature 2.0, geometric cooling by 0.995 per evaluated move, the
/// bottleneck adjustment on and an early stop after 200 consecutive
/// rejections.
///
/// # Examples
///
/// ```
/// use u_staffing::anneal::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_max_iterations(5000)
///     .with_initial_temperature(1.0)
///     .with_cooling_rate(0.999)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.stall_limit, 200);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Number of random move draws. Draws that produce an illegal move use
    /// up budget without being evaluated.
    pub max_iterations: usize,

    /// Starting temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1], applied after every evaluated move.
    pub cooling_rate: f64,

    /// Scale predictions by each unit's weakest department.
    pub bottleneck_aware: bool,

    /// Stop once more than this many consecutive moves were rejected.
    pub stall_limit: usize,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            initial_temperature: 2.0,
            cooling_rate: 0.995,
            bottleneck_aware: true,
            stall_limit: 200,
            seed: None,
        }
    }
}

impl AnnealingConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_bottleneck_aware(mut self, on: bool) -> Self {
        self.bottleneck_aware = on;
        self
    }

    pub fn with_stall_limit(mut self, n: usize) -> Self {
        self.stall_limit = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            ));
        }
        Ok(())
    }
}
