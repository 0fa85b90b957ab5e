//! Forward-algorithm likelihood evaluation for the dynamic occupancy model.
//!
//! The occupancy process is a two-state hidden Markov chain observed
//! through imperfect detection. For each site the marginal probability of
//! its detection history is computed by propagating a length-2 forward
//! vector `alpha` over the flattened occasions, applying the season
//! transition matrix only on steps that cross a season boundary and
//! holding the state fixed within a season.
//!
//! # Conventions
//!
//! - State index 0 is unoccupied, index 1 is occupied, everywhere.
//! - [`emission`] is indexed by the *observed symbol* and returns the
//!   per-state likelihood column: `emission(p, 0) = [1, 1 - p]`,
//!   `emission(p, 1) = [0, p]`. Initialization and every mid-sequence
//!   lookup go through this one function.
//! - The recursion runs in plain probability space with **no underflow
//!   guards and no clamping**. A history that is impossible under the
//!   current parameters drives `sum(alpha)` to zero and the objective to
//!   `+inf`; this is surfaced as a value, not an error, so a calling
//!   optimizer sees the true likelihood surface.
//!
//! Evaluation is pure and stateless: identical inputs produce identical
//! outputs, and per-site recursions are independent of one another.

use finitediff::FiniteDiff;
use ndarray::ArrayView1;
use sora_occupancy::{HistoryMatrix, SurveyDesign};

use crate::error::MleError;
use crate::params::{N_PARAMS, logistic};

/// Computes the total negative log-likelihood of a history matrix.
///
/// `theta` is the raw parameter vector
/// `[logit psi, logit p, logit gamma, logit epsilon]`. Per-site
/// log-likelihood contributions are scaled by the site weights, so a
/// pooled matrix yields exactly the same value as the unpooled one.
///
/// # Errors
///
/// Returns [`MleError::OccasionMismatch`] if the history length disagrees
/// with the design. Numerical degeneracy (an impossible history, extreme
/// parameters) is returned as a non-finite `Ok` value instead.
///
/// # Example
///
/// ```
/// use sora_mle::negative_log_likelihood;
/// use sora_occupancy::{HistoryMatrix, SurveyDesign};
///
/// let design = SurveyDesign::new(2, 2).unwrap();
/// let rows = vec![vec![1, 1, 0, 0], vec![0, 0, 0, 0]];
/// let hist = HistoryMatrix::from_rows(&rows, &design).unwrap();
/// let nll = negative_log_likelihood(&[0.0; 4], &hist, &design).unwrap();
/// assert!(nll.is_finite() && nll > 0.0);
/// ```
pub fn negative_log_likelihood(
    theta: &[f64; N_PARAMS],
    histories: &HistoryMatrix,
    design: &SurveyDesign,
) -> Result<f64, MleError> {
    check_shape(histories, design)?;
    Ok(nll_unchecked(theta, histories, design))
}

/// Computes the gradient of the negative log-likelihood with respect to
/// the four raw parameters by central finite differences.
///
/// # Errors
///
/// Returns [`MleError::OccasionMismatch`] if the history length disagrees
/// with the design. As with the objective itself, degenerate parameter
/// regions yield non-finite gradient entries rather than errors.
pub fn negative_log_likelihood_grad(
    theta: &[f64; N_PARAMS],
    histories: &HistoryMatrix,
    design: &SurveyDesign,
) -> Result<[f64; N_PARAMS], MleError> {
    check_shape(histories, design)?;
    let x = theta.to_vec();
    let g = x.central_diff(&|t: &Vec<f64>| {
        nll_unchecked(&[t[0], t[1], t[2], t[3]], histories, design)
    });
    Ok([g[0], g[1], g[2], g[3]])
}

/// Forward-recursion diagnostics for a single detection history.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardTrace {
    /// Forward vector after incorporating each occasion's symbol,
    /// indexed `[unoccupied, occupied]`.
    pub alphas: Vec<[f64; 2]>,
    /// Whether the step *into* each occasion applied the season
    /// transition matrix (always `false` at occasion 0).
    pub season_steps: Vec<bool>,
    /// The site's log-likelihood contribution, `ln(sum(final alpha))`.
    pub log_likelihood: f64,
}

/// Runs the forward recursion for one history, recording every
/// intermediate forward vector.
///
/// Symbols are interpreted as at evaluation: 0 is observed-absent, any
/// other value is observed-present.
///
/// # Errors
///
/// Returns [`MleError::OccasionMismatch`] if the history length disagrees
/// with the design.
pub fn forward_trace(
    theta: &[f64; N_PARAMS],
    history: &[u8],
    design: &SurveyDesign,
) -> Result<ForwardTrace, MleError> {
    if history.len() != design.n_occasions() {
        return Err(MleError::OccasionMismatch {
            expected: design.n_occasions(),
            got: history.len(),
        });
    }

    let psi = logistic(theta[0]);
    let p = logistic(theta[1]);
    let phi = season_transition(logistic(theta[2]), logistic(theta[3]));

    let mut alphas = Vec::with_capacity(history.len());
    let mut season_steps = Vec::with_capacity(history.len());

    let e = emission(p, history[0]);
    let mut alpha = [(1.0 - psi) * e[0], psi * e[1]];
    alphas.push(alpha);
    season_steps.push(false);

    for (t, &symbol) in history.iter().enumerate().skip(1) {
        let crosses = design.is_season_start(t);
        if crosses {
            alpha = advance(alpha, &phi);
        }
        let e = emission(p, symbol);
        alpha = [alpha[0] * e[0], alpha[1] * e[1]];
        alphas.push(alpha);
        season_steps.push(crosses);
    }

    Ok(ForwardTrace {
        alphas,
        season_steps,
        log_likelihood: (alpha[0] + alpha[1]).ln(),
    })
}

/// Shared shape validation for the public evaluation entry points.
fn check_shape(histories: &HistoryMatrix, design: &SurveyDesign) -> Result<(), MleError> {
    if histories.n_occasions() != design.n_occasions() {
        return Err(MleError::OccasionMismatch {
            expected: design.n_occasions(),
            got: histories.n_occasions(),
        });
    }
    Ok(())
}

/// Evaluation core, called after shape validation.
pub(crate) fn nll_unchecked(
    theta: &[f64; N_PARAMS],
    histories: &HistoryMatrix,
    design: &SurveyDesign,
) -> f64 {
    let psi = logistic(theta[0]);
    let p = logistic(theta[1]);
    let phi = season_transition(logistic(theta[2]), logistic(theta[3]));

    let mut total = 0.0;
    for (history, weight) in histories.iter() {
        total += f64::from(weight) * site_log_likelihood(psi, p, &phi, design, history);
    }
    -total
}

/// Forward recursion over one site's history; returns `ln(sum(alpha))`.
fn site_log_likelihood(
    psi: f64,
    p: f64,
    phi: &[[f64; 2]; 2],
    design: &SurveyDesign,
    history: ArrayView1<'_, u8>,
) -> f64 {
    let e = emission(p, history[0]);
    let mut alpha = [(1.0 - psi) * e[0], psi * e[1]];
    for t in 1..history.len() {
        if design.is_season_start(t) {
            alpha = advance(alpha, phi);
        }
        let e = emission(p, history[t]);
        alpha[0] *= e[0];
        alpha[1] *= e[1];
    }
    (alpha[0] + alpha[1]).ln()
}

/// Row-vector times matrix: one season transition of the forward vector.
fn advance(alpha: [f64; 2], phi: &[[f64; 2]; 2]) -> [f64; 2] {
    [
        alpha[0] * phi[0][0] + alpha[1] * phi[1][0],
        alpha[0] * phi[0][1] + alpha[1] * phi[1][1],
    ]
}

/// Per-state likelihood of an observed symbol.
///
/// Symbol 0 (observed absent) has likelihood 1 at an unoccupied site and
/// `1 - p` at an occupied one; symbol 1 (observed present) has likelihood
/// 0 at an unoccupied site (no false positives) and `p` at an occupied
/// one.
pub(crate) fn emission(p: f64, symbol: u8) -> [f64; 2] {
    match symbol {
        0 => [1.0, 1.0 - p],
        _ => [0.0, p],
    }
}

/// The between-season transition matrix, rows indexed by current state.
pub(crate) fn season_transition(gamma: f64, epsilon: f64) -> [[f64; 2]; 2] {
    [[1.0 - gamma, gamma], [epsilon, 1.0 - epsilon]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::logit;
    use approx::assert_abs_diff_eq;

    fn matrix(rows: &[Vec<u8>], design: &SurveyDesign) -> HistoryMatrix {
        HistoryMatrix::from_rows(rows, design).unwrap()
    }

    fn weighted(rows: &[Vec<u8>], weights: &[u32], design: &SurveyDesign) -> HistoryMatrix {
        HistoryMatrix::from_weighted_rows(rows, weights, design).unwrap()
    }

    #[test]
    fn emission_rows_sum_to_one_over_symbols() {
        for &p in &[0.0, 0.25, 0.7, 1.0] {
            let absent = emission(p, 0);
            let present = emission(p, 1);
            // Unoccupied row of B: [1, 0]; occupied row: [1 - p, p].
            assert_abs_diff_eq!(absent[0] + present[0], 1.0, epsilon = 1e-15);
            assert_abs_diff_eq!(absent[1] + present[1], 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn transition_rows_sum_to_one() {
        for &x in &[-3.0, -0.4, 0.0, 1.2, 5.0] {
            let phi = season_transition(logistic(x), logistic(-x));
            for row in &phi {
                assert_abs_diff_eq!(row[0] + row[1], 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn single_occasion_reduces_to_prior_times_emission() {
        // With one season of one survey, the likelihood is PROP · B[y]
        // and the transition parameters are irrelevant.
        let design = SurveyDesign::new(1, 1).unwrap();
        let theta_base = [0.3, -0.2, 1.7, -0.9];
        let psi = logistic(theta_base[0]);
        let p = logistic(theta_base[1]);

        let detected = matrix(&[vec![1]], &design);
        let nll = negative_log_likelihood(&theta_base, &detected, &design).unwrap();
        assert_abs_diff_eq!(nll, -(psi * p).ln(), epsilon = 1e-12);

        let missed = matrix(&[vec![0]], &design);
        let nll = negative_log_likelihood(&theta_base, &missed, &design).unwrap();
        assert_abs_diff_eq!(nll, -((1.0 - psi) + psi * (1.0 - p)).ln(), epsilon = 1e-12);

        // Changing gamma/epsilon must not change the value at all.
        let theta_alt = [theta_base[0], theta_base[1], -4.0, 6.0];
        let nll_alt = negative_log_likelihood(&theta_alt, &missed, &design).unwrap();
        assert_eq!(nll.to_bits(), nll_alt.to_bits());
    }

    #[test]
    fn secondary_steps_never_penalize_constant_history() {
        // psi = 1 and p = 1 make an all-ones single-season history certain;
        // within-season steps must apply no transition, so gamma and
        // epsilon cannot leak in.
        let design = SurveyDesign::new(1, 4).unwrap();
        let hist = matrix(&[vec![1, 1, 1, 1]], &design);
        for &(g, e) in &[(-3.0, 2.0), (0.0, 0.0), (5.0, -5.0)] {
            let nll = negative_log_likelihood(&[40.0, 40.0, g, e], &hist, &design).unwrap();
            assert_eq!(nll, 0.0, "gamma/epsilon leaked into a within-season step");
        }
    }

    #[test]
    fn certain_two_season_history_has_zero_nll() {
        // J = 1, K = 2, psi = 1, p = 1, epsilon ~ 0: observing [1, 1] is
        // certain, so the negative log-likelihood is exactly zero.
        let design = SurveyDesign::new(2, 1).unwrap();
        let hist = matrix(&[vec![1, 1]], &design);
        let theta = [40.0, 40.0, 0.0, -40.0];
        let nll = negative_log_likelihood(&theta, &hist, &design).unwrap();
        assert_eq!(nll, 0.0);
    }

    #[test]
    fn impossible_history_yields_infinite_nll() {
        // Same design but p = 0 exactly (the logistic underflows at -710):
        // a detection is impossible, alpha collapses to [0, 0], and the
        // objective is +inf. No underflow guard may soften this.
        let design = SurveyDesign::new(2, 1).unwrap();
        let hist = matrix(&[vec![1, 1]], &design);
        let theta = [40.0, -710.0, 0.0, -40.0];
        let nll = negative_log_likelihood(&theta, &hist, &design).unwrap();
        assert_eq!(nll, f64::INFINITY);
    }

    #[test]
    fn never_occupied_consistent_and_inconsistent_histories() {
        // psi = 0 and gamma = 0 exactly: an all-absent history is certain
        // (nll = 0); any detection is impossible (nll = +inf).
        let design = SurveyDesign::new(3, 2).unwrap();
        let theta = [-710.0, 0.3, -710.0, 0.0];

        let absent = matrix(&[vec![0; 6]], &design);
        let nll = negative_log_likelihood(&theta, &absent, &design).unwrap();
        assert_eq!(nll, 0.0);

        let detected = matrix(&[vec![0, 0, 1, 0, 0, 0]], &design);
        let nll = negative_log_likelihood(&theta, &detected, &design).unwrap();
        assert_eq!(nll, f64::INFINITY);
    }

    #[test]
    fn weight_two_equals_two_copies() {
        let design = SurveyDesign::new(2, 2).unwrap();
        let row = vec![0, 1, 0, 1];
        let theta = [0.2, -0.1, 0.4, -0.6];

        let doubled = weighted(&[row.clone()], &[2], &design);
        let copies = matrix(&[row.clone(), row], &design);

        let a = negative_log_likelihood(&theta, &doubled, &design).unwrap();
        let b = negative_log_likelihood(&theta, &copies, &design).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn pooling_preserves_likelihood() {
        let design = SurveyDesign::new(2, 3).unwrap();
        let rows = vec![
            vec![0, 1, 0, 0, 0, 1],
            vec![1, 1, 1, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 1],
            vec![0, 0, 0, 0, 0, 0],
            vec![0, 1, 0, 0, 0, 1],
        ];
        let hist = matrix(&rows, &design);
        let theta = [0.5, 0.8, -1.2, -0.7];

        let raw = negative_log_likelihood(&theta, &hist, &design).unwrap();
        let pooled = negative_log_likelihood(&theta, &hist.pool(), &design).unwrap();
        assert_abs_diff_eq!(raw, pooled, epsilon = 1e-12);
    }

    #[test]
    fn evaluation_is_pure() {
        let design = SurveyDesign::new(3, 3).unwrap();
        let hist = matrix(&[vec![0, 1, 0, 0, 0, 0, 1, 1, 0]], &design);
        let theta = [0.1, 0.9, -0.3, 0.7];
        let a = negative_log_likelihood(&theta, &hist, &design).unwrap();
        let b = negative_log_likelihood(&theta, &hist, &design).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let design_fit = SurveyDesign::new(2, 2).unwrap();
        let design_other = SurveyDesign::new(2, 3).unwrap();
        let hist = matrix(&[vec![0, 1, 0, 0, 0, 0]], &design_other);

        let err = negative_log_likelihood(&[0.0; 4], &hist, &design_fit).unwrap_err();
        assert!(matches!(
            err,
            MleError::OccasionMismatch {
                expected: 4,
                got: 6
            }
        ));
        let err = negative_log_likelihood_grad(&[0.0; 4], &hist, &design_fit).unwrap_err();
        assert!(matches!(err, MleError::OccasionMismatch { .. }));
        let err = forward_trace(&[0.0; 4], &[0, 1], &design_fit).unwrap_err();
        assert!(matches!(err, MleError::OccasionMismatch { .. }));
    }

    #[test]
    fn gradient_matches_closed_form_single_occasion() {
        // J = K = 1 with a single detected site: nll = -ln(psi) - ln(p),
        // so d/dtheta0 = logistic(theta0) - 1, d/dtheta1 = logistic(theta1) - 1,
        // and the transition coordinates have zero gradient.
        let design = SurveyDesign::new(1, 1).unwrap();
        let hist = matrix(&[vec![1]], &design);
        let theta = [0.4, -0.8, 0.3, -0.2];

        let grad = negative_log_likelihood_grad(&theta, &hist, &design).unwrap();
        assert_abs_diff_eq!(grad[0], logistic(theta[0]) - 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(grad[1], logistic(theta[1]) - 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(grad[2], 0.0, epsilon = 1e-8);
        assert_abs_diff_eq!(grad[3], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn trace_records_alphas_and_season_steps() {
        let design = SurveyDesign::new(2, 2).unwrap();
        let theta = [40.0, 40.0, 0.0, -40.0]; // psi = p = 1, epsilon = 0
        let trace = forward_trace(&theta, &[1, 1, 1, 1], &design).unwrap();

        assert_eq!(trace.season_steps, vec![false, false, true, false]);
        assert_eq!(trace.alphas.len(), 4);
        for alpha in &trace.alphas {
            assert_abs_diff_eq!(alpha[0], 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(alpha[1], 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(trace.log_likelihood, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn trace_log_likelihood_matches_evaluator() {
        let design = SurveyDesign::new(3, 2).unwrap();
        let row = vec![0, 1, 0, 0, 1, 1];
        let hist = matrix(&[row.clone()], &design);
        let theta = [logit(0.6), logit(0.7), logit(0.2), logit(0.3)];

        let nll = negative_log_likelihood(&theta, &hist, &design).unwrap();
        let trace = forward_trace(&theta, &row, &design).unwrap();
        assert_abs_diff_eq!(trace.log_likelihood, -nll, epsilon = 1e-12);
    }
}
