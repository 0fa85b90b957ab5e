use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Sora configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SoraConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Survey design settings.
    #[serde(default)]
    pub design: DesignToml,

    /// Simulation settings.
    #[serde(default)]
    pub simulate: SimulateToml,

    /// Fit settings.
    #[serde(default)]
    pub fit: FitToml,
}

/// Loads and parses a TOML configuration file.
pub fn load(path: &Path) -> Result<SoraConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config: {}", path.display()))
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignToml {
    #[serde(default = "default_n_seasons")]
    pub n_seasons: usize,
    #[serde(default = "default_n_surveys")]
    pub n_surveys: usize,
}

impl Default for DesignToml {
    fn default() -> Self {
        Self {
            n_seasons: default_n_seasons(),
            n_surveys: default_n_surveys(),
        }
    }
}

fn default_n_seasons() -> usize {
    5
}
fn default_n_surveys() -> usize {
    3
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulateToml {
    #[serde(default = "default_n_sites")]
    pub n_sites: usize,
    #[serde(default = "default_psi")]
    pub psi: f64,
    #[serde(default = "default_p")]
    pub p: f64,
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for SimulateToml {
    fn default() -> Self {
        Self {
            n_sites: default_n_sites(),
            psi: default_psi(),
            p: default_p(),
            gamma: default_gamma(),
            epsilon: default_epsilon(),
        }
    }
}

fn default_n_sites() -> usize {
    250
}
fn default_psi() -> f64 {
    0.6
}
fn default_p() -> f64 {
    0.7
}
fn default_gamma() -> f64 {
    0.2
}
fn default_epsilon() -> f64 {
    0.3
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FitToml {
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
    #[serde(default = "default_sd_tolerance")]
    pub sd_tolerance: f64,
    #[serde(default)]
    pub init: Option<InitToml>,
}

impl Default for FitToml {
    fn default() -> Self {
        Self {
            max_iters: default_max_iters(),
            sd_tolerance: default_sd_tolerance(),
            init: None,
        }
    }
}

fn default_max_iters() -> u64 {
    1000
}
fn default_sd_tolerance() -> f64 {
    1e-8
}

/// Natural-scale starting values for the optimizer.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitToml {
    pub psi: f64,
    pub p: f64,
    pub gamma: f64,
    pub epsilon: f64,
}
