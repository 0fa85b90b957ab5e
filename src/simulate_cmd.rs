use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use sora_occupancy::{HistoryMatrix, simulate_histories};

use crate::cli::SimulateArgs;
use crate::config;
use crate::convert;

/// Run the `simulate` subcommand.
pub fn run(args: SimulateArgs) -> Result<()> {
    let cfg = config::load(&args.config)?;
    let design = convert::build_design(&cfg.design)?;
    let probs = convert::build_true_probs(&cfg.simulate)?;

    let output = args.output.or(cfg.io.output).ok_or_else(|| {
        anyhow::anyhow!("no output path: set [io].output in config or use --output")
    })?;

    let mut rng = match args.seed.or(cfg.seed) {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    info!(
        n_sites = cfg.simulate.n_sites,
        n_seasons = design.n_seasons(),
        n_surveys = design.n_surveys(),
        "simulating detection histories"
    );
    let hist = simulate_histories(&design, &probs, cfg.simulate.n_sites, &mut rng)
        .map_err(|e| anyhow::anyhow!("simulation failed: {e}"))?;

    write_histories(&output, &hist)
        .with_context(|| format!("failed to write histories: {}", output.display()))?;
    info!(path = %output.display(), n_sites = hist.n_sites(), "histories written");

    Ok(())
}

/// Writes a history matrix as CSV: one row per site, columns `site, y1..yN`.
fn write_histories(path: &Path, hist: &HistoryMatrix) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["site".to_string()];
    header.extend((1..=hist.n_occasions()).map(|t| format!("y{t}")));
    wtr.write_record(&header)?;

    for (i, (row, _)) in hist.iter().enumerate() {
        let mut record = vec![(i + 1).to_string()];
        record.extend(row.iter().map(|&y| y.to_string()));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
