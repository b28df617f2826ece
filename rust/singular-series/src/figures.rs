//! Plot-ready data for the two convergence figures.
//!
//! Rendering happens elsewhere; this module only turns the convergence table
//! and the fixed asymptotic constant into the numbers the plots are drawn from.
//!
//! Figure 1 traces the partial product against p and marks the first drop
//! (the first splitting prime). Figure 2 compares expected prime counts in a
//! search window of size H at n = 10^10000:
//!
//!   E(H) = (S / d) · H / ln x
//!
//! for Q (d = 46, S = 8.70), a generic degree-46 polynomial (S = 1) and the
//! integers themselves (d = 1, S = 1).

use serde::{Deserialize, Serialize};

use crate::report::ConvergencePoint;

/// Asymptotic value of S(Q) used for the density comparison. Taken from the
/// summary report, not recomputed.
pub const ASYMPTOTIC_S: f64 = 8.70;

/// Decimal digits of the scale n = 10^DIGITS.
pub const DIGITS: u32 = 10_000;

/// Default right edge of the window axis.
pub const DEFAULT_H_MAX: f64 = 1.3e6;

/// Default number of samples per curve.
pub const DEFAULT_POINTS: usize = 1_000;

/// Shape of the convergence curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceProfile {
    pub num_points: usize,
    /// Last partial product; drawn as the asymptote line.
    pub final_value: f64,
    pub peak_prime: u64,
    pub peak_value: f64,
    /// First point lower than its predecessor.
    pub first_drop: Option<ConvergencePoint>,
}

impl ConvergenceProfile {
    /// `None` for an empty table.
    pub fn from_points(points: &[ConvergencePoint]) -> Option<Self> {
        let last = points.last()?;

        let peak = points
            .iter()
            .copied()
            .fold(points[0], |best, p| if p.partial_product > best.partial_product { p } else { best });

        let first_drop = points
            .windows(2)
            .find(|w| w[1].partial_product < w[0].partial_product)
            .map(|w| w[1]);

        Some(ConvergenceProfile {
            num_points: points.len(),
            final_value: last.partial_product,
            peak_prime: peak.prime,
            peak_value: peak.partial_product,
            first_drop,
        })
    }
}

/// Figure-1 data: the full curve plus its profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceFigure {
    pub profile: Option<ConvergenceProfile>,
    pub points: Vec<ConvergencePoint>,
}

/// Expected-prime-count model at the scale n = 10^digits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapCompressionModel {
    /// Natural log of the scale, digits · ln 10.
    pub ln_x: f64,
    pub singular_series: f64,
    pub degree: f64,
}

impl GapCompressionModel {
    pub fn new(digits: u32, singular_series: f64, degree: f64) -> Self {
        GapCompressionModel {
            ln_x: digits as f64 * std::f64::consts::LN_10,
            singular_series,
            degree,
        }
    }

    /// Q itself: degree 46 with the asymptotic singular series.
    pub fn q47() -> Self {
        Self::new(DIGITS, ASYMPTOTIC_S, 46.0)
    }

    /// A degree-46 polynomial with no local bias.
    pub fn generic() -> Self {
        Self::new(DIGITS, 1.0, 46.0)
    }

    /// The integers: degree 1, no local bias.
    pub fn integers() -> Self {
        Self::new(DIGITS, 1.0, 1.0)
    }

    /// Expected number of primes among H consecutive values.
    pub fn expected_primes(&self, h: f64) -> f64 {
        (self.singular_series / self.degree) * h / self.ln_x
    }

    /// Window size at which one prime is expected.
    pub fn threshold_window(&self) -> f64 {
        self.degree * self.ln_x / self.singular_series
    }
}

/// One sample of the three figure-2 curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub h: f64,
    pub q47: f64,
    pub generic: f64,
    pub integers: f64,
}

/// Figure-2 data: threshold windows plus sampled curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityComparison {
    pub ln_x: f64,
    pub asymptotic_s: f64,
    pub q47_threshold: f64,
    pub generic_threshold: f64,
    pub curves: Vec<DensityPoint>,
}

/// Sample all three curves on an inclusive linear grid over `[0, h_max]`.
pub fn density_comparison(h_max: f64, points: usize) -> DensityComparison {
    let q47 = GapCompressionModel::q47();
    let generic = GapCompressionModel::generic();
    let integers = GapCompressionModel::integers();

    let curves = linspace(0.0, h_max, points)
        .into_iter()
        .map(|h| DensityPoint {
            h,
            q47: q47.expected_primes(h),
            generic: generic.expected_primes(h),
            integers: integers.expected_primes(h),
        })
        .collect();

    DensityComparison {
        ln_x: q47.ln_x,
        asymptotic_s: ASYMPTOTIC_S,
        q47_threshold: q47.threshold_window(),
        generic_threshold: generic.threshold_window(),
        curves,
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 | 1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
