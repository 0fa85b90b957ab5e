//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::Result;

use sora_mle::FitOptions;
use sora_occupancy::{OccupancyProbs, SurveyDesign};

use crate::config::{DesignToml, FitToml, SimulateToml};

/// Builds a [`SurveyDesign`] from the TOML design configuration.
pub fn build_design(design: &DesignToml) -> Result<SurveyDesign> {
    SurveyDesign::new(design.n_seasons, design.n_surveys)
        .map_err(|e| anyhow::anyhow!("building survey design: {e}"))
}

/// Builds the true simulation parameters from the TOML configuration.
pub fn build_true_probs(simulate: &SimulateToml) -> Result<OccupancyProbs> {
    OccupancyProbs::new(simulate.psi, simulate.p, simulate.gamma, simulate.epsilon)
        .map_err(|e| anyhow::anyhow!("building simulation parameters: {e}"))
}

/// Builds [`FitOptions`] from the TOML fit configuration.
pub fn build_fit_options(fit: &FitToml) -> Result<FitOptions> {
    let mut options = FitOptions::new()
        .with_max_iters(fit.max_iters)
        .with_sd_tolerance(fit.sd_tolerance);
    if let Some(ref init) = fit.init {
        let probs = OccupancyProbs::new(init.psi, init.p, init.gamma, init.epsilon)
            .map_err(|e| anyhow::anyhow!("building starting values: {e}"))?;
        options = options.with_init(probs);
    }
    options
        .validate()
        .map_err(|e| anyhow::anyhow!("validating fit options: {e}"))?;
    Ok(options)
}
