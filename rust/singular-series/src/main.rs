//! singular-series CLI: Bateman-Horn singular series for Q(n) = n^47 - (n-1)^47.
//!
//! Modes:
//!   --mode=compute                 Sieve, accumulate, print summary, write data (default)
//!   --mode=figures                 Read convergence.csv, write figure data JSON
//!
//! Options:
//!   --bound=<N>          Upper limit for prime generation, at most 1000000000 (default: 100000)
//!   --data-dir=<path>    Output directory (default: data)
//!   --parallel           Use the segmented parallel sieve
//!   --segment-len=<N>    Segment length for the parallel sieve (implies --parallel)
//!   --no-write           Print the summary only

use std::path::PathBuf;

use singular_series::{build_figures, persist, run_series, Mode, RunConfig, SeriesError};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match RunConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Usage: singular-series [--mode=compute|figures] [--bound=N] [--data-dir=PATH] [--parallel] [--segment-len=N] [--no-write]");
            std::process::exit(1);
        }
    };

    let result = match config.mode {
        Mode::Compute => run_compute_mode(&config),
        Mode::Figures => run_figures_mode(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_compute_mode(config: &RunConfig) -> Result<(), SeriesError> {
    println!("{}", "=".repeat(60));
    println!("  Singular Series S(Q) for Q(n) = n^47 - (n-1)^47");
    println!("  Computing partial products up to p = {}", config.bound);
    println!("{}", "=".repeat(60));
    println!();

    let run = run_series(config)?;
    println!("{}", run.report());

    if config.write_outputs {
        let written = persist(&run, &config.data_dir)?;
        println!();
        print_written(&written);
    }

    println!("  [DONE]");
    Ok(())
}

fn run_figures_mode(config: &RunConfig) -> Result<(), SeriesError> {
    println!("--- Figure data from {} ---", config.data_dir.display());
    let written = build_figures(&config.data_dir)?;
    print_written(&written);
    Ok(())
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("  Saved to {}", path.display());
    }
}
