//! # Singular Series
//!
//! Bateman-Horn singular series for Q(n) = n^47 - (n-1)^47:
//!
//!   S(Q) = Π_p (1 - ω(p)/p) / (1 - 1/p)
//!
//! where ω(p) is the number of roots of Q mod p (0 or 46). Primes with ω = 0
//! push S up, primes p ≡ 1 (mod 47) pull it down; the product settles near
//! 8.70 by p = 10^5.
//!
//! The computation is two pure stages, sieve then accumulate, followed by
//! explicit writes of the convergence table and summary.

pub mod config;
pub mod error;
pub mod figures;
pub mod omega;
pub mod report;
pub mod series;
pub mod sieve;

use std::path::{Path, PathBuf};

pub use config::{Mode, RunConfig};
pub use error::SeriesError;
pub use omega::{classify, local_factor, omega_q, PrimeClass, EXPONENT, SPLIT_ROOTS};
pub use report::{ConvergencePoint, SummaryReport};
pub use series::{accumulate, LocalFactorRecord, SeriesSummary, SingularSeries};
pub use sieve::{sieve_primes, sieve_primes_segmented, Bound, PrimeSieve, SieveStrategy};

/// Convergence table file name inside the data directory.
pub const CONVERGENCE_CSV: &str = "convergence.csv";
/// Summary report file name inside the data directory.
pub const SUMMARY_JSON: &str = "summary.json";
/// Figure 1 data file name.
pub const FIGURE1_JSON: &str = "figure1_convergence.json";
/// Figure 2 data file name.
pub const FIGURE2_JSON: &str = "figure2_density.json";

/// Result of one sieve + accumulate pass.
#[derive(Debug, Clone)]
pub struct SeriesRun {
    pub bound: Bound,
    pub records: Vec<LocalFactorRecord>,
    pub summary: SeriesSummary,
}

impl SeriesRun {
    pub fn report(&self) -> SummaryReport {
        SummaryReport::new(self.bound.get(), &self.summary)
    }
}

/// Sieve up to the configured bound and accumulate the product. No I/O.
pub fn run_series(config: &RunConfig) -> Result<SeriesRun, SeriesError> {
    let primes = PrimeSieve::new(config.bound)
        .with_strategy(config.strategy)
        .primes()?;
    log::info!(
        "Sieved {} primes up to {} ({:?})",
        primes.len(),
        config.bound,
        config.strategy
    );
    if primes.is_empty() {
        log::warn!("No primes up to {}; S is the empty product", config.bound);
    }

    let records = accumulate(&primes)?;
    let summary = SeriesSummary::from_records(&records);
    log::info!(
        "S(Q) = {:.6} over {} shielding and {} splitting primes",
        summary.singular_series,
        summary.n_shielding,
        summary.n_splitting
    );

    Ok(SeriesRun {
        bound: config.bound,
        records,
        summary,
    })
}

/// Write `convergence.csv` and `summary.json` into `data_dir`.
pub fn persist(run: &SeriesRun, data_dir: &Path) -> Result<Vec<PathBuf>, SeriesError> {
    let csv_path = data_dir.join(CONVERGENCE_CSV);
    report::save_convergence_csv(&csv_path, &run.records)?;

    let summary_path = data_dir.join(SUMMARY_JSON);
    report::write_json(&summary_path, &run.report())?;

    Ok(vec![csv_path, summary_path])
}

/// Read `convergence.csv` from `data_dir` and write both figure data files.
pub fn build_figures(data_dir: &Path) -> Result<Vec<PathBuf>, SeriesError> {
    let points = report::load_convergence_csv(&data_dir.join(CONVERGENCE_CSV))?;

    let fig1_path = data_dir.join(FIGURE1_JSON);
    let profile = figures::ConvergenceProfile::from_points(&points);
    match &profile {
        Some(p) => {
            if let Some(drop) = p.first_drop {
                log::info!(
                    "First drop at p={} (S={:.6})",
                    drop.prime,
                    drop.partial_product
                );
            }
        }
        None => log::warn!("Convergence table is empty; figure 1 has no curve"),
    }
    report::write_json(&fig1_path, &figures::ConvergenceFigure { profile, points })?;

    let fig2_path = data_dir.join(FIGURE2_JSON);
    let density = figures::density_comparison(figures::DEFAULT_H_MAX, figures::DEFAULT_POINTS);
    report::write_json(&fig2_path, &density)?;

    Ok(vec![fig1_path, fig2_path])
}
