//! Integration tests for the singular series pipeline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use singular_series::report::{load_convergence_csv, CSV_HEADER};
use singular_series::{
    accumulate, build_figures, omega_q, persist, run_series, sieve_primes, sieve_primes_segmented,
    Bound, LocalFactorRecord, PrimeSieve, RunConfig, SeriesError, SeriesSummary, SieveStrategy,
    SingularSeries, SummaryReport, CONVERGENCE_CSV, FIGURE1_JSON, FIGURE2_JSON, SUMMARY_JSON,
};

fn config_with_bound(bound: u64) -> RunConfig {
    RunConfig {
        bound: Bound::new(bound).unwrap(),
        ..RunConfig::default()
    }
}

fn is_prime_trial(n: u64) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

#[test]
fn test_sieve_properties_random_bounds() {
    let mut rng = StdRng::seed_from_u64(47);
    for _ in 0..20 {
        let bound: u64 = rng.gen_range(2..5_000);
        let primes = sieve_primes(bound).unwrap();

        assert!(primes.windows(2).all(|w| w[0] < w[1]), "not increasing at bound {bound}");
        assert!(primes.iter().all(|&p| is_prime_trial(p)), "composite at bound {bound}");
        let expected = (2..=bound).filter(|&n| is_prime_trial(n)).count();
        assert_eq!(primes.len(), expected, "missing primes at bound {bound}");
    }
}

#[test]
fn test_omega_rule_over_sieve_output() {
    for p in sieve_primes(20_000).unwrap() {
        let expected = if p == 47 {
            0
        } else if (p - 1) % 47 == 0 {
            46
        } else {
            0
        };
        assert_eq!(omega_q(p), expected, "p={p}");
    }
}

#[test]
fn test_counts_partition_primes() {
    let mut rng = StdRng::seed_from_u64(283);
    for _ in 0..10 {
        let bound: u64 = rng.gen_range(0..30_000);
        let run = run_series(&config_with_bound(bound)).unwrap();
        assert_eq!(run.summary.total(), sieve_primes(bound).unwrap().len());
        assert_eq!(run.summary.total(), run.records.len());
    }
}

#[test]
fn test_monotone_steps() {
    let records = accumulate(&sieve_primes(20_000).unwrap()).unwrap();
    let mut prev = 1.0;
    for r in &records {
        if r.omega == 0 {
            assert!(r.local_factor > 1.0);
            assert!(r.partial_product > prev, "no rise at p={}", r.prime);
        } else {
            assert!(r.local_factor < 1.0);
            assert!(r.partial_product < prev, "no drop at p={}", r.prime);
        }
        prev = r.partial_product;
    }
}

#[test]
fn test_streaming_matches_batch_product() {
    let primes = sieve_primes(100_000).unwrap();
    let records = accumulate(&primes).unwrap();

    let batch: f64 = records.iter().map(|r| r.local_factor).product();
    let streamed = records.last().unwrap().partial_product;
    assert!(((batch - streamed) / streamed).abs() < 1e-9);

    // Pairwise reduction reorders the multiplications; only tolerance holds.
    fn pairwise(xs: &[f64]) -> f64 {
        match xs.len() {
            0 => 1.0,
            1 => xs[0],
            n => pairwise(&xs[..n / 2]) * pairwise(&xs[n / 2..]),
        }
    }
    let factors: Vec<f64> = records.iter().map(|r| r.local_factor).collect();
    assert!(((pairwise(&factors) - streamed) / streamed).abs() < 1e-9);
}

#[test]
fn test_bound_ten_scenario() {
    let run = run_series(&config_with_bound(10)).unwrap();
    let primes: Vec<u64> = run.records.iter().map(|r| r.prime).collect();
    assert_eq!(primes, vec![2, 3, 5, 7]);
    assert!(run.records.iter().all(|r| r.omega == 0));
    assert!((run.summary.singular_series - 4.375).abs() < 1e-12);
    assert_eq!(run.summary.n_splitting, 0);
}

#[test]
fn test_bound_300_scenario() {
    let run = run_series(&config_with_bound(300)).unwrap();
    let first_split = run.records.iter().find(|r| r.omega == 46).unwrap();
    assert_eq!(first_split.prime, 283);
    assert!((first_split.local_factor - 0.8404).abs() < 1e-4);
    assert_eq!(run.summary.n_splitting, 1);
    assert!((run.summary.singular_series - 8.592944).abs() < 1e-6);
}

#[test]
fn test_bound_46_has_no_drops() {
    let run = run_series(&config_with_bound(46)).unwrap();
    assert_eq!(run.summary.n_splitting, 0);
    assert_eq!(run.summary.n_shielding, 14);
    assert!(run.records.windows(2).all(|w| w[1].partial_product > w[0].partial_product));
    assert!(run.summary.singular_series > 1.0);
    assert!((run.summary.singular_series - 7.056197).abs() < 1e-6);
}

#[test]
fn test_reference_bound() {
    let run = run_series(&RunConfig::default()).unwrap();
    let report = run.report();
    assert_eq!(report.bound, 100_000);
    assert_eq!(report.prime_count, 9592);
    assert_eq!(report.n_shielding, 9390);
    assert_eq!(report.n_splitting, 202);
    assert_eq!(format!("{:.6}", report.singular_series), "8.697445");
    assert_eq!(format!("{:.2}", report.compression_factor), "8.70");
    assert_eq!(format!("{:.2}", report.effective_degree), "5.29");
}

#[test]
fn test_idempotent_runs() {
    let a = run_series(&config_with_bound(50_000)).unwrap();
    let b = run_series(&config_with_bound(50_000)).unwrap();
    assert_eq!(a.records, b.records);
    assert_eq!(a.summary, b.summary);
}

#[test]
fn test_parallel_sieve_gives_identical_records() {
    let sequential = run_series(&config_with_bound(60_000)).unwrap();
    let parallel = run_series(&RunConfig {
        strategy: SieveStrategy::Segmented { segment_len: 1_000 },
        ..config_with_bound(60_000)
    })
    .unwrap();
    assert_eq!(sequential.records, parallel.records);
    assert_eq!(sieve_primes_segmented(60_000, 0).unwrap(), sieve_primes(60_000).unwrap());
}

#[test]
fn test_small_and_negative_bounds() {
    assert!(run_series(&config_with_bound(0)).unwrap().records.is_empty());
    assert!(run_series(&config_with_bound(1)).unwrap().records.is_empty());
    assert_eq!(PrimeSieve::new(Bound::new(2).unwrap()).primes().unwrap(), vec![2]);

    let empty = run_series(&config_with_bound(1)).unwrap();
    assert_eq!(empty.summary.singular_series, 1.0);

    let err = Bound::try_from(-10i64).unwrap_err();
    assert!(err.is_invalid_argument());
}

#[test]
fn test_oversized_bound_is_rejected_before_sieving() {
    let args = vec!["--bound=18446744073709551615".to_string()];
    let err = RunConfig::from_args(&args).unwrap_err();
    assert!(matches!(err, SeriesError::InvalidBound(ref b) if b == "18446744073709551615"));
    assert!(err.is_invalid_argument());

    assert!(matches!(sieve_primes(u64::MAX), Err(SeriesError::InvalidBound(_))));
    assert!(matches!(
        sieve_primes_segmented(u64::MAX, usize::MAX),
        Err(SeriesError::InvalidBound(_))
    ));
}

#[test]
fn test_invalid_prime_sequences() {
    let err = accumulate(&[2, 3, 5, 5]).unwrap_err();
    assert!(matches!(err, SeriesError::NotIncreasing { .. }));

    // A partially valid stream yields its good records before failing.
    let items: Vec<Result<LocalFactorRecord, SeriesError>> =
        SingularSeries::new(vec![2u64, 3, 1, 5]).collect();
    assert_eq!(items.len(), 3);
    assert!(items[0].is_ok() && items[1].is_ok());
    assert!(matches!(items[2], Err(SeriesError::BelowTwo(1))));
}

#[test]
fn test_persist_and_build_figures() {
    let dir = tempfile::tempdir().unwrap();
    let run = run_series(&config_with_bound(2_000)).unwrap();

    let written = persist(&run, dir.path()).unwrap();
    assert_eq!(written, vec![dir.path().join(CONVERGENCE_CSV), dir.path().join(SUMMARY_JSON)]);

    let csv = std::fs::read_to_string(dir.path().join(CONVERGENCE_CSV)).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(lines.next(), Some("2,0,2.00000000,2.000000"));
    assert_eq!(csv.lines().count(), run.records.len() + 1);

    let summary: SummaryReport =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(SUMMARY_JSON)).unwrap())
            .unwrap();
    assert_eq!(summary.prime_count, 303);
    assert_eq!(summary.n_splitting, 7);

    let points = load_convergence_csv(&dir.path().join(CONVERGENCE_CSV)).unwrap();
    assert_eq!(points.len(), run.records.len());

    let figures = build_figures(dir.path()).unwrap();
    assert_eq!(figures, vec![dir.path().join(FIGURE1_JSON), dir.path().join(FIGURE2_JSON)]);

    let fig1: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(FIGURE1_JSON)).unwrap())
            .unwrap();
    assert_eq!(fig1["profile"]["first_drop"]["prime"], 283);
    assert_eq!(fig1["points"].as_array().unwrap().len(), 303);

    let fig2: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(FIGURE2_JSON)).unwrap())
            .unwrap();
    assert_eq!(fig2["asymptotic_s"], 8.70);
    assert_eq!(fig2["curves"].as_array().unwrap().len(), 1_000);
}

#[test]
fn test_build_figures_without_table_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = build_figures(dir.path()).unwrap_err();
    assert!(matches!(err, SeriesError::Io(_)));
}

#[test]
fn test_summary_from_streamed_records() {
    let records: Vec<LocalFactorRecord> = SingularSeries::new(sieve_primes(1_000).unwrap())
        .collect::<Result<_, _>>()
        .unwrap();
    let summary = SeriesSummary::from_records(&records);
    assert_eq!(summary.n_splitting, 3);
    assert_eq!(summary.n_shielding, 165);
    assert!((summary.singular_series - 9.151065).abs() < 1e-6);
}
