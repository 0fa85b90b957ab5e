use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use sora_mle::{OccupancyFit, OccupancyModel};
use sora_occupancy::HistoryMatrix;

use crate::cli::FitArgs;
use crate::config;
use crate::convert;

/// Run the `fit` subcommand.
pub fn run(args: FitArgs) -> Result<()> {
    let cfg = config::load(&args.config)?;
    let design = convert::build_design(&cfg.design)?;
    let options = convert::build_fit_options(&cfg.fit)?;

    let rows = read_histories(&args.input)
        .with_context(|| format!("failed to read histories: {}", args.input.display()))?;
    let hist = HistoryMatrix::from_rows(&rows, &design)
        .map_err(|e| anyhow::anyhow!("building history matrix: {e}"))?;
    let pooled = hist.pool();
    info!(
        n_sites = hist.n_sites(),
        n_pooled = pooled.n_sites(),
        "fitting dynamic occupancy model"
    );

    let fit = OccupancyModel::new(design)
        .fit_with(&pooled, &options)
        .map_err(|e| anyhow::anyhow!("fit failed: {e}"))?;

    info!(
        iterations = fit.iterations(),
        converged = fit.converged(),
        "fit complete"
    );
    println!("psi     = {:.4}", fit.psi());
    println!("p       = {:.4}", fit.p());
    println!("gamma   = {:.4}", fit.gamma());
    println!("epsilon = {:.4}", fit.epsilon());
    println!("loglik  = {:.4}", fit.log_likelihood());
    println!("AIC     = {:.4}", fit.aic());

    if let Some(report_path) = args.output {
        write_report(&report_path, &fit, hist.n_sites(), pooled.n_sites())
            .with_context(|| format!("failed to write report: {}", report_path.display()))?;
        info!(path = %report_path.display(), "report written");
    }

    Ok(())
}

/// Reads detection histories from CSV: one row per site, first column a
/// site label, remaining columns 0/1 detection symbols.
fn read_histories(path: &Path) -> Result<Vec<Vec<u8>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let mut row = Vec::with_capacity(record.len().saturating_sub(1));
        for field in record.iter().skip(1) {
            let symbol: u8 = field
                .trim()
                .parse()
                .with_context(|| format!("row {}: invalid detection symbol {field:?}", i + 1))?;
            row.push(symbol);
        }
        rows.push(row);
    }
    Ok(rows)
}

/// JSON fit report.
#[derive(Serialize)]
struct FitReport {
    n_seasons: usize,
    n_surveys: usize,
    n_sites: usize,
    n_pooled: usize,
    psi: f64,
    p: f64,
    gamma: f64,
    epsilon: f64,
    theta: [f64; 4],
    log_likelihood: f64,
    aic: f64,
    iterations: u64,
    converged: bool,
}

fn write_report(path: &Path, fit: &OccupancyFit, n_sites: usize, n_pooled: usize) -> Result<()> {
    let report = FitReport {
        n_seasons: fit.design().n_seasons(),
        n_surveys: fit.design().n_surveys(),
        n_sites,
        n_pooled,
        psi: fit.psi(),
        p: fit.p(),
        gamma: fit.gamma(),
        epsilon: fit.epsilon(),
        theta: *fit.theta(),
        log_likelihood: fit.log_likelihood(),
        aic: fit.aic(),
        iterations: fit.iterations(),
        converged: fit.converged(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)?;
    Ok(())
}
