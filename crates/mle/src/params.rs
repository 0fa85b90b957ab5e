//! Logit-scale parameterization of the occupancy parameters.
//!
//! Optimizers work on an unconstrained vector
//! `theta = [logit psi, logit p, logit gamma, logit epsilon]`; the logistic
//! function maps each coordinate into (0, 1) before any probability is
//! used. This module is the *only* place that mapping exists — no other
//! component re-derives or duplicates it.

use sora_occupancy::OccupancyProbs;

use crate::error::MleError;

/// Number of raw parameters: psi, p, gamma, epsilon.
pub const N_PARAMS: usize = 4;

/// The standard logistic function `x -> 1 / (1 + exp(-x))`.
///
/// Maps any finite real into (0, 1). For |x| beyond roughly 37 the result
/// saturates to exactly 0.0 or 1.0 through ordinary f64 rounding; no
/// clamping is applied anywhere downstream.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// The logit function `p -> ln(p / (1 - p))`, inverse of [`logistic`].
///
/// Returns `-inf` at 0 and `+inf` at 1; callers that need a finite raw
/// parameter (e.g. optimizer starting values) must supply an interior
/// probability.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Decodes a raw parameter vector into natural-scale probabilities.
///
/// # Errors
///
/// Returns [`MleError::NonFiniteParams`] if any coordinate is NaN (the
/// logistic function maps every other real, including infinities, into
/// [0, 1]).
pub fn theta_to_probs(theta: &[f64; N_PARAMS]) -> Result<OccupancyProbs, MleError> {
    OccupancyProbs::new(
        logistic(theta[0]),
        logistic(theta[1]),
        logistic(theta[2]),
        logistic(theta[3]),
    )
    .map_err(|_| MleError::NonFiniteParams)
}
