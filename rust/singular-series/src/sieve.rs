//! Prime generation up to an inclusive bound.
//!
//! Two strategies produce the same ordered list:
//! - a plain Sieve of Eratosthenes over one marker array, and
//! - a segmented sieve whose segments are marked in parallel with rayon and
//!   concatenated in segment order.
//!
//! The accumulator downstream depends on strictly increasing input, so the
//! segmented variant never reorders its output.

use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

use crate::error::SeriesError;

/// Bound used when none is configured.
pub const DEFAULT_BOUND: u64 = 100_000;

/// Largest accepted bound. The marker array holds one byte per integer, so
/// this caps a single run at about 1 GB.
pub const MAX_BOUND: u64 = 1_000_000_000;

/// Default number of integers per segment for the segmented sieve.
pub const DEFAULT_SEGMENT_LEN: usize = 1 << 15;

/// Inclusive upper limit for prime generation, at most [`MAX_BOUND`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bound(u64);

impl Bound {
    pub fn new(value: u64) -> Result<Self, SeriesError> {
        check_bound(value)?;
        Ok(Bound(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for Bound {
    fn default() -> Self {
        Bound(DEFAULT_BOUND)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Bound {
    type Error = SeriesError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = u64::try_from(value).map_err(|_| SeriesError::InvalidBound(value.to_string()))?;
        Bound::new(value)
    }
}

impl FromStr for Bound {
    type Err = SeriesError;

    /// Accepts any text denoting a non-negative integer, including
    /// float notation with no fractional part such as `1e5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if let Ok(v) = text.parse::<i64>() {
            return Bound::try_from(v);
        }
        if let Ok(v) = text.parse::<u64>() {
            return Bound::new(v);
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= MAX_BOUND as f64 => {
                Bound::new(v as u64)
            }
            _ => Err(SeriesError::InvalidBound(text.to_string())),
        }
    }
}

/// How `PrimeSieve` marks composites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SieveStrategy {
    #[default]
    Sequential,
    Segmented { segment_len: usize },
}

/// Prime source for one run: a bound plus a marking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeSieve {
    pub bound: Bound,
    pub strategy: SieveStrategy,
}

impl PrimeSieve {
    pub fn new(bound: Bound) -> Self {
        PrimeSieve {
            bound,
            strategy: SieveStrategy::Sequential,
        }
    }

    pub fn with_strategy(mut self, strategy: SieveStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// All primes `p` with `2 <= p <= bound`, increasing.
    pub fn primes(&self) -> Result<Vec<u64>, SeriesError> {
        match self.strategy {
            SieveStrategy::Sequential => sieve_primes(self.bound.get()),
            SieveStrategy::Segmented { segment_len } => {
                sieve_primes_segmented(self.bound.get(), segment_len)
            }
        }
    }
}

/// Reject bounds the marker array cannot be sized for.
fn check_bound(bound: u64) -> Result<usize, SeriesError> {
    if bound > MAX_BOUND {
        return Err(SeriesError::InvalidBound(bound.to_string()));
    }
    usize::try_from(bound).map_err(|_| SeriesError::InvalidBound(bound.to_string()))
}

/// Generate a list of primes up to a bound using the sieve of Eratosthenes.
pub fn sieve_primes(bound: u64) -> Result<Vec<u64>, SeriesError> {
    let n = check_bound(bound)?;
    if n < 2 {
        return Ok(vec![]);
    }

    let len = n
        .checked_add(1)
        .ok_or_else(|| SeriesError::InvalidBound(bound.to_string()))?;
    let mut is_prime = vec![true; len];
    is_prime[0] = false;
    is_prime[1] = false;

    // Multiples below i*i already carry a smaller prime factor.
    let limit = num_integer::sqrt(n);
    for i in 2..=limit {
        if is_prime[i] {
            let mut multiple = i * i;
            while multiple <= n {
                is_prime[multiple] = false;
                multiple += i;
            }
        }
    }

    Ok(is_prime
        .iter()
        .enumerate()
        .filter_map(|(i, &is_p)| if is_p { Some(i as u64) } else { None })
        .collect())
}

/// Segmented sieve: `[2, bound]` is cut into windows of `segment_len`
/// integers, each marked independently against the base primes up to
/// `isqrt(bound)`. Output is identical to [`sieve_primes`].
pub fn sieve_primes_segmented(bound: u64, segment_len: usize) -> Result<Vec<u64>, SeriesError> {
    check_bound(bound)?;
    if bound < 2 {
        return Ok(vec![]);
    }

    // Integers in [2, bound]; a segment never needs to be longer than that.
    let span = bound - 1;
    let segment_len = match segment_len {
        0 => DEFAULT_SEGMENT_LEN as u64,
        len => u64::try_from(len).unwrap_or(u64::MAX).min(span),
    };

    let base = sieve_primes(num_integer::sqrt(bound))?;
    let num_segments = ((span + segment_len - 1) / segment_len) as usize;

    let segments: Vec<Vec<u64>> = (0..num_segments)
        .into_par_iter()
        .map(|k| {
            let lo = 2 + k as u64 * segment_len;
            let hi = lo.saturating_add(segment_len - 1).min(bound);
            sieve_segment(lo, hi, &base)
        })
        .collect();

    Ok(segments.into_iter().flatten().collect())
}

/// Primes in the inclusive window `[lo, hi]`, given every prime up to `isqrt(hi)`.
fn sieve_segment(lo: u64, hi: u64, base: &[u64]) -> Vec<u64> {
    let mut marks = vec![true; (hi - lo + 1) as usize];

    for &p in base {
        if p * p > hi {
            break;
        }
        let first_multiple = ((lo + p - 1) / p) * p;
        let mut m = first_multiple.max(p * p);
        while m <= hi {
            marks[(m - lo) as usize] = false;
            m += p;
        }
    }

    marks
        .iter()
        .enumerate()
        .filter_map(|(i, &is_p)| if is_p { Some(lo + i as u64) } else { None })
        .collect()
}
