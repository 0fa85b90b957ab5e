//! Error types for the sora-mle crate.

/// Error type for all fallible operations in the sora-mle crate.
///
/// Shape mismatches and invalid configuration are rejected eagerly through
/// these variants. Numerical degeneracy during likelihood evaluation is
/// *not* an error: the evaluator surfaces it as a non-finite objective
/// value so an optimizer sees the true surface.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MleError {
    /// Returned when history length disagrees with the survey design.
    #[error("histories have {got} occasions, design requires {expected}")]
    OccasionMismatch {
        /// Occasions required by the design.
        expected: usize,
        /// Occasions found in the history matrix.
        got: usize,
    },

    /// Returned when fitting a design with fewer than two seasons, which
    /// leaves colonization and extinction unidentified.
    #[error("fitting requires at least 2 seasons, design has {n_seasons}")]
    InsufficientSeasons {
        /// Seasons in the offending design.
        n_seasons: usize,
    },

    /// Returned when a parameter vector contains NaN or infinity where a
    /// finite estimate is required.
    #[error("parameter vector contains non-finite values")]
    NonFiniteParams,

    /// Returned when fit options fail validation.
    #[error("invalid fit options: {reason}")]
    InvalidOptions {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when the optimization algorithm fails to converge.
    #[error("optimisation failed to converge")]
    OptimizationFailed,
}
