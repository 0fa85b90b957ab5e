//! Error types for the sora-occupancy crate.

/// Error type for all fallible operations in the sora-occupancy crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OccupancyError {
    /// Returned when a survey design has zero seasons or zero surveys.
    #[error("invalid survey design: {reason}")]
    InvalidDesign {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when no detection histories are provided.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when a history row length disagrees with the design.
    #[error("history for site {site} has {got} occasions, expected {expected}")]
    LengthMismatch {
        /// Zero-based site index.
        site: usize,
        /// Number of occasions required by the design.
        expected: usize,
        /// Number of occasions in the offending row.
        got: usize,
    },

    /// Returned when a detection symbol is neither 0 nor 1.
    #[error("invalid detection symbol {value} at site {site}, occasion {occasion} (must be 0 or 1)")]
    InvalidSymbol {
        /// Zero-based site index.
        site: usize,
        /// Zero-based occasion index.
        occasion: usize,
        /// The offending symbol.
        value: u8,
    },

    /// Returned when history and weight counts disagree.
    #[error("weight mismatch: {histories} histories but {weights} weights")]
    WeightMismatch {
        /// Number of history rows.
        histories: usize,
        /// Number of weights provided.
        weights: usize,
    },

    /// Returned when a site weight is zero.
    #[error("site {site} has zero weight (weights must be positive)")]
    ZeroWeight {
        /// Zero-based site index.
        site: usize,
    },

    /// Returned when a probability is non-finite or outside [0, 1].
    #[error("invalid probability {name} = {value} (must be finite and in [0, 1])")]
    InvalidProbability {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },
}
