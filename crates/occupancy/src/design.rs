//! Survey design: seasons, surveys, and the occasion partition.

use crate::error::OccupancyError;

/// A robust-design survey layout: `n_seasons` primary periods, each visited
/// `n_surveys` times.
///
/// Detection histories are stored flattened to `n_seasons * n_surveys`
/// occasions in season-major order. All occasion indices in this workspace
/// are **zero-based**; occasion `t` belongs to season `t / n_surveys`.
///
/// The occupancy state may change only between seasons. The last survey of
/// each season is a *primary* occasion; the step from a primary occasion
/// into the first survey of the next season crosses a season boundary and
/// is the only place the colonization/extinction transition applies. All
/// other steps hold the state fixed. Occasion 0 is the initialization
/// point and belongs to neither set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyDesign {
    n_seasons: usize,
    n_surveys: usize,
}

impl SurveyDesign {
    /// Creates a design with `n_seasons` primary periods of `n_surveys`
    /// secondary visits each.
    ///
    /// # Errors
    ///
    /// Returns [`OccupancyError::InvalidDesign`] if either count is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use sora_occupancy::SurveyDesign;
    ///
    /// let design = SurveyDesign::new(5, 3).unwrap();
    /// assert_eq!(design.n_occasions(), 15);
    /// assert_eq!(design.primary_occasions(), vec![2, 5, 8, 11, 14]);
    /// ```
    pub fn new(n_seasons: usize, n_surveys: usize) -> Result<Self, OccupancyError> {
        if n_seasons == 0 {
            return Err(OccupancyError::InvalidDesign {
                reason: "n_seasons must be at least 1".to_string(),
            });
        }
        if n_surveys == 0 {
            return Err(OccupancyError::InvalidDesign {
                reason: "n_surveys must be at least 1".to_string(),
            });
        }
        Ok(Self {
            n_seasons,
            n_surveys,
        })
    }

    /// Returns the number of seasons (primary periods).
    pub fn n_seasons(&self) -> usize {
        self.n_seasons
    }

    /// Returns the number of surveys per season (secondary visits).
    pub fn n_surveys(&self) -> usize {
        self.n_surveys
    }

    /// Returns the flattened history length `n_seasons * n_surveys`.
    pub fn n_occasions(&self) -> usize {
        self.n_seasons * self.n_surveys
    }

    /// Returns the zero-based season containing occasion `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is out of range.
    pub fn season_of(&self, t: usize) -> usize {
        assert!(
            t < self.n_occasions(),
            "occasion {t} out of range (n_occasions = {})",
            self.n_occasions()
        );
        t / self.n_surveys
    }

    /// Returns `true` if the step *into* occasion `t` crosses a season
    /// boundary, i.e. `t` is the first survey of a season other than the
    /// first.
    ///
    /// Equivalent to occasion `t - 1` being primary.
    pub fn is_season_start(&self, t: usize) -> bool {
        t > 0 && t % self.n_surveys == 0
    }

    /// Returns `true` if occasion `t` is the last survey of its season.
    pub fn is_primary(&self, t: usize) -> bool {
        t % self.n_surveys == self.n_surveys - 1
    }

    /// Returns the primary occasions: the last survey of each season.
    pub fn primary_occasions(&self) -> Vec<usize> {
        (0..self.n_occasions()).filter(|&t| self.is_primary(t)).collect()
    }

    /// Returns the secondary occasions: every non-initial occasion that is
    /// not primary.
    pub fn secondary_occasions(&self) -> Vec<usize> {
        (1..self.n_occasions())
            .filter(|&t| !self.is_primary(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_seasons() {
        let err = SurveyDesign::new(0, 3).unwrap_err();
        assert!(matches!(err, OccupancyError::InvalidDesign { .. }));
    }

    #[test]
    fn rejects_zero_surveys() {
        let err = SurveyDesign::new(3, 0).unwrap_err();
        assert!(matches!(err, OccupancyError::InvalidDesign { .. }));
    }

    #[test]
    fn accessors_round_trip() {
        let design = SurveyDesign::new(4, 3).unwrap();
        assert_eq!(design.n_seasons(), 4);
        assert_eq!(design.n_surveys(), 3);
        assert_eq!(design.n_occasions(), 12);
    }

    #[test]
    fn season_of_occasions() {
        let design = SurveyDesign::new(3, 2).unwrap();
        assert_eq!(design.season_of(0), 0);
        assert_eq!(design.season_of(1), 0);
        assert_eq!(design.season_of(2), 1);
        assert_eq!(design.season_of(5), 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn season_of_panics_out_of_range() {
        let design = SurveyDesign::new(2, 2).unwrap();
        design.season_of(4);
    }

    #[test]
    fn season_starts() {
        let design = SurveyDesign::new(3, 2).unwrap();
        // Occasion 0 initializes the recursion; steps into 2 and 4 cross
        // season boundaries.
        let starts: Vec<usize> = (0..design.n_occasions())
            .filter(|&t| design.is_season_start(t))
            .collect();
        assert_eq!(starts, vec![2, 4]);
    }

    #[test]
    fn partition_covers_non_initial_occasions() {
        let design = SurveyDesign::new(4, 3).unwrap();
        let primary = design.primary_occasions();
        let secondary = design.secondary_occasions();

        assert_eq!(primary, vec![2, 5, 8, 11]);

        let mut all: Vec<usize> = primary.iter().chain(secondary.iter()).copied().collect();
        all.sort_unstable();
        // Together with occasion 0 (claimed by neither set), the union is 0..N.
        let expected: Vec<usize> = (1..design.n_occasions()).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn single_survey_design_every_occasion_primary() {
        // With one survey per season every occasion ends its season, and
        // every step crosses a boundary.
        let design = SurveyDesign::new(4, 1).unwrap();
        assert_eq!(design.primary_occasions(), vec![0, 1, 2, 3]);
        assert!(design.secondary_occasions().is_empty());
        for t in 1..4 {
            assert!(design.is_season_start(t));
        }
    }

    #[test]
    fn single_season_design_has_no_boundaries() {
        let design = SurveyDesign::new(1, 5).unwrap();
        assert!((0..5).all(|t| !design.is_season_start(t)));
        assert_eq!(design.primary_occasions(), vec![4]);
        assert_eq!(design.secondary_occasions(), vec![1, 2, 3]);
    }

    #[test]
    fn design_is_copy_and_eq() {
        let a = SurveyDesign::new(2, 3).unwrap();
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, SurveyDesign::new(3, 2).unwrap());
    }
}
