//! Fitted occupancy model results.

use sora_occupancy::{OccupancyProbs, SurveyDesign};

use crate::params::N_PARAMS;

/// A fitted dynamic occupancy model produced by
/// [`OccupancyModel::fit()`](crate::OccupancyModel::fit).
///
/// Holds the maximum-likelihood estimates on both scales (raw logit-space
/// `theta` and natural probabilities), the objective value at the optimum,
/// and optimizer diagnostics. Use the accessors to inspect results.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyFit {
    design: SurveyDesign,
    theta: [f64; N_PARAMS],
    probs: OccupancyProbs,
    nll: f64,
    iterations: u64,
    converged: bool,
}

impl OccupancyFit {
    /// Creates a new `OccupancyFit` (crate-internal constructor).
    pub(crate) fn new(
        design: SurveyDesign,
        theta: [f64; N_PARAMS],
        probs: OccupancyProbs,
        nll: f64,
        iterations: u64,
        converged: bool,
    ) -> Self {
        Self {
            design,
            theta,
            probs,
            nll,
            iterations,
            converged,
        }
    }

    /// Returns the survey design this model was fitted under.
    pub fn design(&self) -> SurveyDesign {
        self.design
    }

    /// Returns the raw logit-scale parameter estimates
    /// `[logit psi, logit p, logit gamma, logit epsilon]`.
    pub fn theta(&self) -> &[f64; N_PARAMS] {
        &self.theta
    }

    /// Returns all natural-scale estimates.
    pub fn probs(&self) -> OccupancyProbs {
        self.probs
    }

    /// Returns the estimated initial occupancy probability.
    pub fn psi(&self) -> f64 {
        self.probs.psi()
    }

    /// Returns the estimated detection probability.
    pub fn p(&self) -> f64 {
        self.probs.p()
    }

    /// Returns the estimated colonization probability.
    pub fn gamma(&self) -> f64 {
        self.probs.gamma()
    }

    /// Returns the estimated extinction probability.
    pub fn epsilon(&self) -> f64 {
        self.probs.epsilon()
    }

    /// Returns the negative log-likelihood at the optimum.
    pub fn nll(&self) -> f64 {
        self.nll
    }

    /// Returns the maximised log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        -self.nll
    }

    /// Computes the Akaike Information Criterion for this fit.
    ///
    /// AIC = 2k - 2 * log_likelihood with k = 4 estimated parameters.
    /// Lower AIC indicates a better trade-off between fit and complexity.
    pub fn aic(&self) -> f64 {
        2.0 * N_PARAMS as f64 - 2.0 * self.log_likelihood()
    }

    /// Returns the number of optimizer iterations performed.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Returns `true` if the optimizer reported a terminating status.
    pub fn converged(&self) -> bool {
        self.converged
    }
}
