mod cli;
mod config;
mod convert;
mod fit_cmd;
mod logging;
mod simulate_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Simulate(args) => simulate_cmd::run(args),
        Command::Fit(args) => fit_cmd::run(args),
    }
}
