//! Output sinks: console summary, convergence CSV, JSON.
//!
//! The CSV schema is consumed by the plotting side and must stay stable:
//!
//! ```text
//! prime_p,omega_Q_p,local_factor,partial_product_S
//! 2,0,2.00000000,2.000000
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::SeriesError;
use crate::series::{LocalFactorRecord, SeriesSummary};

/// Header row of the convergence table.
pub const CSV_HEADER: &str = "prime_p,omega_Q_p,local_factor,partial_product_S";

/// Everything printed at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub bound: u64,
    pub prime_count: usize,
    pub n_shielding: usize,
    pub n_splitting: usize,
    pub singular_series: f64,
    pub compression_factor: f64,
    pub effective_degree: f64,
}

impl SummaryReport {
    pub fn new(bound: u64, summary: &SeriesSummary) -> Self {
        SummaryReport {
            bound,
            prime_count: summary.total(),
            n_shielding: summary.n_shielding,
            n_splitting: summary.n_splitting,
            singular_series: summary.singular_series,
            compression_factor: summary.compression_factor(),
            effective_degree: summary.effective_degree(),
        }
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total primes up to {}: {}", self.bound, self.prime_count)?;
        writeln!(f)?;
        writeln!(f, "Shielding primes (omega=0): {}", self.n_shielding)?;
        writeln!(f, "Splitting primes (omega=46): {}", self.n_splitting)?;
        writeln!(f)?;
        writeln!(f, "S(Q) = {:.6}", self.singular_series)?;
        writeln!(f, "Compression factor: {:.2}x", self.compression_factor)?;
        write!(
            f,
            "Effective degree: 46 / {:.2} = {:.2}",
            self.compression_factor, self.effective_degree
        )
    }
}

/// Write the header and one row per record.
pub fn write_convergence_csv<W: Write>(
    mut writer: W,
    records: &[LocalFactorRecord],
) -> Result<(), SeriesError> {
    writeln!(writer, "{}", CSV_HEADER)?;
    for r in records {
        writeln!(
            writer,
            "{},{},{:.8},{:.6}",
            r.prime, r.omega, r.local_factor, r.partial_product
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the convergence table to `path`, creating parent directories.
pub fn save_convergence_csv(path: &Path, records: &[LocalFactorRecord]) -> Result<(), SeriesError> {
    create_parent_dir(path)?;
    let file = File::create(path)?;
    write_convergence_csv(BufWriter::new(file), records)?;
    log::info!("Saved {} rows to {}", records.len(), path.display());
    Ok(())
}

/// One `(prime, partial product)` pair read back from the convergence table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub prime: u64,
    pub partial_product: f64,
}

/// Parse a convergence table. The header row, `#` comment lines and blank
/// lines are skipped; any other row must have four comma-separated fields.
pub fn parse_convergence_csv<R: BufRead>(reader: R) -> Result<Vec<ConvergencePoint>, SeriesError> {
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("prime_p") {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(SeriesError::MalformedRow {
                line: line_no,
                reason: format!("expected 4 fields, found {}", fields.len()),
            });
        }

        let prime = fields[0].parse::<u64>().map_err(|e| SeriesError::MalformedRow {
            line: line_no,
            reason: format!("prime_p '{}': {}", fields[0], e),
        })?;
        let partial_product = fields[3].parse::<f64>().map_err(|e| SeriesError::MalformedRow {
            line: line_no,
            reason: format!("partial_product_S '{}': {}", fields[3], e),
        })?;

        points.push(ConvergencePoint {
            prime,
            partial_product,
        });
    }

    Ok(points)
}

/// Load a convergence table written by [`save_convergence_csv`].
pub fn load_convergence_csv(path: &Path) -> Result<Vec<ConvergencePoint>, SeriesError> {
    let file = File::open(path)?;
    let points = parse_convergence_csv(BufReader::new(file))?;
    log::info!("Loaded {} rows from {}", points.len(), path.display());
    Ok(points)
}

/// Serialize `value` as pretty JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SeriesError> {
    create_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<(), SeriesError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
