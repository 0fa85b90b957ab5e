//! Fit configuration.

use sora_occupancy::OccupancyProbs;

use crate::error::MleError;

/// Configuration for the maximum-likelihood fit.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use sora_mle::FitOptions;
///
/// let options = FitOptions::new()
///     .with_max_iters(500)
///     .with_sd_tolerance(1e-10);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    max_iters: u64,
    sd_tolerance: f64,
    init: Option<OccupancyProbs>,
}

impl FitOptions {
    /// Creates options with defaults: `max_iters = 1000`,
    /// `sd_tolerance = 1e-8`, starting values at probability 0.5 (the
    /// origin of the logit scale).
    pub fn new() -> Self {
        Self {
            max_iters: 1000,
            sd_tolerance: 1e-8,
            init: None,
        }
    }

    /// Sets the iteration cap for the optimizer.
    pub fn with_max_iters(mut self, max_iters: u64) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Sets the Nelder-Mead standard-deviation termination tolerance.
    pub fn with_sd_tolerance(mut self, sd_tolerance: f64) -> Self {
        self.sd_tolerance = sd_tolerance;
        self
    }

    /// Sets natural-scale starting values for the search.
    ///
    /// Each probability must be strictly inside (0, 1) so that its logit
    /// is finite.
    pub fn with_init(mut self, init: OccupancyProbs) -> Self {
        self.init = Some(init);
        self
    }

    // --- Accessors ---

    /// Returns the iteration cap.
    pub fn max_iters(&self) -> u64 {
        self.max_iters
    }

    /// Returns the termination tolerance.
    pub fn sd_tolerance(&self) -> f64 {
        self.sd_tolerance
    }

    /// Returns the starting values, if any.
    pub fn init(&self) -> Option<&OccupancyProbs> {
        self.init.as_ref()
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MleError::InvalidOptions`] if `max_iters` is zero, the
    /// tolerance is non-finite or non-positive, or a starting probability
    /// sits on the boundary of [0, 1].
    pub fn validate(&self) -> Result<(), MleError> {
        if self.max_iters == 0 {
            return Err(MleError::InvalidOptions {
                reason: "max_iters must be positive".to_string(),
            });
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance <= 0.0 {
            return Err(MleError::InvalidOptions {
                reason: format!(
                    "sd_tolerance must be finite and positive, got {}",
                    self.sd_tolerance
                ),
            });
        }
        if let Some(init) = &self.init {
            for (name, value) in [
                ("psi", init.psi()),
                ("p", init.p()),
                ("gamma", init.gamma()),
                ("epsilon", init.epsilon()),
            ] {
                if value <= 0.0 || value >= 1.0 {
                    return Err(MleError::InvalidOptions {
                        reason: format!(
                            "starting value {name} = {value} must be strictly inside (0, 1)"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::new()
    }
}
