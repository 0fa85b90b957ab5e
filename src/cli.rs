use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sora dynamic occupancy modelling tool.
#[derive(Parser)]
#[command(
    name = "sora",
    version,
    about = "Simulate and fit dynamic occupancy models"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Simulate a detection-history dataset from known parameters.
    Simulate(SimulateArgs),
    /// Fit the dynamic occupancy model to a detection-history dataset.
    Fit(FitArgs),
}

/// Arguments for the `simulate` subcommand.
#[derive(clap::Args)]
pub struct SimulateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sora.toml")]
    pub config: PathBuf,

    /// Override output CSV path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `fit` subcommand.
#[derive(clap::Args)]
pub struct FitArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "sora.toml")]
    pub config: PathBuf,

    /// Path to input detection-history CSV file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the JSON fit report.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
