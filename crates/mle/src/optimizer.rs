//! Nelder-Mead optimizer for occupancy maximum-likelihood estimation.
//!
//! Wraps the `argmin` crate to minimize the negative log-likelihood over
//! the four logit-scale parameters.
//!
//! **Not part of the public API.**

use argmin::core::{CostFunction, Executor, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use sora_occupancy::{HistoryMatrix, SurveyDesign};

use crate::error::MleError;
use crate::fit::OccupancyFit;
use crate::likelihood;
use crate::options::FitOptions;
use crate::params::{N_PARAMS, logit, theta_to_probs};

/// Fits a dynamic occupancy model to detection histories via MLE.
///
/// This is the full pipeline:
/// 1. Validate options, shape, and design
/// 2. Build the starting simplex on the logit scale
/// 3. Minimize the negative log-likelihood via Nelder-Mead
/// 4. Decode the optimum back to natural-scale estimates
pub(crate) fn fit_occupancy(
    design: SurveyDesign,
    histories: &HistoryMatrix,
    options: &FitOptions,
) -> Result<OccupancyFit, MleError> {
    // 1. Validate
    options.validate()?;
    if histories.n_occasions() != design.n_occasions() {
        return Err(MleError::OccasionMismatch {
            expected: design.n_occasions(),
            got: histories.n_occasions(),
        });
    }
    if design.n_seasons() < 2 {
        return Err(MleError::InsufficientSeasons {
            n_seasons: design.n_seasons(),
        });
    }

    // 2. Build simplex: the requested starting point plus one vertex
    // offset by 0.5 along each logit coordinate.
    let center: [f64; N_PARAMS] = match options.init() {
        Some(init) => [
            logit(init.psi()),
            logit(init.p()),
            logit(init.gamma()),
            logit(init.epsilon()),
        ],
        None => [0.0; N_PARAMS],
    };
    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(N_PARAMS + 1);
    simplex.push(center.to_vec());
    for i in 0..N_PARAMS {
        let mut vertex = center.to_vec();
        vertex[i] += 0.5;
        simplex.push(vertex);
    }

    // 3. Run Nelder-Mead
    let cost = OccupancyCost {
        histories,
        design: &design,
    };
    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(options.sd_tolerance())
        .map_err(|_| MleError::OptimizationFailed)?;
    let result = Executor::new(cost, solver)
        .configure(|state| state.max_iters(options.max_iters()))
        .run()
        .map_err(|_| MleError::OptimizationFailed)?;

    let state = result.state();
    let best = state
        .best_param
        .as_ref()
        .ok_or(MleError::OptimizationFailed)?;
    let theta = [best[0], best[1], best[2], best[3]];

    // 4. Decode estimates and re-evaluate the objective at the optimum
    let probs = theta_to_probs(&theta)?;
    let nll = likelihood::negative_log_likelihood(&theta, histories, &design)?;
    if !nll.is_finite() {
        return Err(MleError::OptimizationFailed);
    }
    let converged = !matches!(state.termination_status, TerminationStatus::NotTerminated);

    Ok(OccupancyFit::new(
        design,
        theta,
        probs,
        nll,
        state.iter,
        converged,
    ))
}

/// Cost function for argmin: the negative log-likelihood.
///
/// Non-finite objective values (impossible histories under the candidate
/// parameters) are mapped to `f64::MAX` here, in the optimizer adapter
/// only, so the solver backs away from degenerate regions while the
/// evaluator itself keeps reporting the true surface.
struct OccupancyCost<'a> {
    histories: &'a HistoryMatrix,
    design: &'a SurveyDesign,
}

impl CostFunction for OccupancyCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        let theta = [theta[0], theta[1], theta[2], theta[3]];
        match likelihood::negative_log_likelihood(&theta, self.histories, self.design) {
            Ok(nll) if nll.is_finite() => Ok(nll),
            _ => Ok(f64::MAX),
        }
    }
}
