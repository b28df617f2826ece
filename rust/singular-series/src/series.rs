//! Running Euler product for the singular series.
//!
//! S(Q) = Π_p (1 - ω(p)/p) / (1 - 1/p)
//!
//! Records are produced one prime at a time. The only state carried between
//! primes is the running product, which starts at 1.0 and is multiplied in
//! increasing prime order; reordering would change the rounding.

use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::omega::{classify, local_factor, PrimeClass, SPLIT_ROOTS};

/// One row of the convergence table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFactorRecord {
    pub prime: u64,
    /// Roots of Q mod p: 0 or 46.
    pub omega: u32,
    pub local_factor: f64,
    /// Product of all local factors up to and including this prime.
    pub partial_product: f64,
}

impl LocalFactorRecord {
    pub fn class(&self) -> PrimeClass {
        if self.omega == 0 {
            PrimeClass::Shielding
        } else {
            PrimeClass::Splitting
        }
    }
}

/// Streaming accumulator over an increasing sequence of primes.
///
/// Yields one `Ok(record)` per input prime. A prime below 2, or one that is
/// not strictly greater than its predecessor, yields a single `Err` and the
/// stream ends. Primality itself is not re-checked.
#[derive(Debug, Clone)]
pub struct SingularSeries<I> {
    primes: I,
    partial_product: f64,
    last_prime: Option<u64>,
    failed: bool,
}

impl<I> SingularSeries<I>
where
    I: Iterator<Item = u64>,
{
    pub fn new<T>(primes: T) -> Self
    where
        T: IntoIterator<IntoIter = I, Item = u64>,
    {
        SingularSeries {
            primes: primes.into_iter(),
            partial_product: 1.0,
            last_prime: None,
            failed: false,
        }
    }

    /// Running product after the records yielded so far.
    pub fn partial_product(&self) -> f64 {
        self.partial_product
    }
}

impl<I> Iterator for SingularSeries<I>
where
    I: Iterator<Item = u64>,
{
    type Item = Result<LocalFactorRecord, SeriesError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let p = self.primes.next()?;

        if p < 2 {
            self.failed = true;
            return Some(Err(SeriesError::BelowTwo(p)));
        }
        if let Some(prev) = self.last_prime {
            if p <= prev {
                self.failed = true;
                return Some(Err(SeriesError::NotIncreasing { prev, next: p }));
            }
        }
        self.last_prime = Some(p);

        let class = classify(p);
        let omega = class.omega();
        let factor = local_factor(p, omega);
        self.partial_product *= factor;

        if class == PrimeClass::Splitting {
            log::debug!(
                "Splitting prime p={} (factor {:.8}, S -> {:.6})",
                p,
                factor,
                self.partial_product
            );
        }

        Some(Ok(LocalFactorRecord {
            prime: p,
            omega,
            local_factor: factor,
            partial_product: self.partial_product,
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, self.primes.size_hint().1)
        }
    }
}

/// Materialize the full record sequence. Any invalid prime discards
/// everything computed so far.
pub fn accumulate(primes: &[u64]) -> Result<Vec<LocalFactorRecord>, SeriesError> {
    SingularSeries::new(primes.iter().copied()).collect()
}

/// Aggregate view of a finished record stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Records with omega = 0.
    pub n_shielding: usize,
    /// Records with omega = 46.
    pub n_splitting: usize,
    /// Final partial product, or 1.0 for an empty stream.
    pub singular_series: f64,
}

impl SeriesSummary {
    pub fn from_records(records: &[LocalFactorRecord]) -> Self {
        let n_splitting = records.iter().filter(|r| r.omega == SPLIT_ROOTS).count();
        SeriesSummary {
            n_shielding: records.len() - n_splitting,
            n_splitting,
            singular_series: records.last().map_or(1.0, |r| r.partial_product),
        }
    }

    pub fn total(&self) -> usize {
        self.n_shielding + self.n_splitting
    }

    /// The factor by which prime density exceeds the generic-polynomial heuristic.
    pub fn compression_factor(&self) -> f64 {
        self.singular_series
    }

    /// 46 / S: the degree a generic polynomial with S = 1 would need to match Q.
    pub fn effective_degree(&self) -> f64 {
        SPLIT_ROOTS as f64 / self.singular_series
    }
}
