//! Occupancy model specification (unfitted).

use sora_occupancy::{HistoryMatrix, SurveyDesign};

use crate::error::MleError;
use crate::fit::OccupancyFit;
use crate::options::FitOptions;

/// An unfitted dynamic occupancy model bound to a survey design.
///
/// This is the entry point of the fitting workflow. Create a model with
/// [`OccupancyModel::new()`], then call [`OccupancyModel::fit()`] to
/// obtain an [`OccupancyFit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OccupancyModel {
    design: SurveyDesign,
}

impl OccupancyModel {
    /// Creates a model for the given survey design.
    pub fn new(design: SurveyDesign) -> Self {
        Self { design }
    }

    /// Returns the survey design.
    pub fn design(&self) -> SurveyDesign {
        self.design
    }

    /// Fits the model to detection histories with default options.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`MleError::OccasionMismatch`] | history length disagrees with the design |
    /// | [`MleError::InsufficientSeasons`] | design has fewer than 2 seasons |
    /// | [`MleError::OptimizationFailed`] | optimizer fails or lands on a non-finite optimum |
    pub fn fit(&self, histories: &HistoryMatrix) -> Result<OccupancyFit, MleError> {
        self.fit_with(histories, &FitOptions::default())
    }

    /// Fits the model with explicit options.
    ///
    /// # Errors
    ///
    /// As [`OccupancyModel::fit`], plus [`MleError::InvalidOptions`] for a
    /// configuration that fails validation.
    pub fn fit_with(
        &self,
        histories: &HistoryMatrix,
        options: &FitOptions,
    ) -> Result<OccupancyFit, MleError> {
        crate::optimizer::fit_occupancy(self.design, histories, options)
    }
}
