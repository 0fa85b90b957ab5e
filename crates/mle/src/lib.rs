//! # sora-mle
//!
//! Maximum-likelihood fitting of two-state dynamic occupancy models via a
//! hidden-Markov forward algorithm.
//!
//! The likelihood evaluator is a pure function of the raw logit-scale
//! parameter vector, a detection-history matrix, and a survey design; it
//! is designed to be handed to a numerical optimizer. The built-in fitter
//! minimizes it with Nelder-Mead, and a finite-difference gradient is
//! available for callers that bring their own gradient-based solver.
//!
//! ## Workflow
//!
//! ```ignore
//! let fit = OccupancyModel::new(design).fit(&histories)?;
//! println!("psi = {:.3}, p = {:.3}", fit.psi(), fit.p());
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | psi | [`OccupancyFit::psi()`] | Initial occupancy probability |
//! | p | [`OccupancyFit::p()`] | Per-survey detection probability |
//! | gamma | [`OccupancyFit::gamma()`] | Between-season colonization probability |
//! | epsilon | [`OccupancyFit::epsilon()`] | Between-season extinction probability |
//! | theta | [`OccupancyFit::theta()`] | The four estimates on the logit scale |
//! | AIC | [`OccupancyFit::aic()`] | Akaike Information Criterion (lower = better) |
//!
//! Raw parameters are unconstrained reals; [`params`] owns the logistic
//! mapping onto probabilities and nothing else in the workspace may
//! duplicate it.

mod error;
mod fit;
mod model;
mod options;

pub mod likelihood;
pub mod params;

pub(crate) mod optimizer;

pub use error::MleError;
pub use fit::OccupancyFit;
pub use likelihood::{
    ForwardTrace, forward_trace, negative_log_likelihood, negative_log_likelihood_grad,
};
pub use model::OccupancyModel;
pub use options::FitOptions;
