//! Run configuration and `--key=value` option parsing.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::SeriesError;
use crate::sieve::{Bound, SieveStrategy, DEFAULT_SEGMENT_LEN};

/// What the binary does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Sieve, accumulate, print the summary and write the data files.
    #[default]
    Compute,
    /// Read a previously written convergence table and emit figure data.
    Figures,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub mode: Mode,
    pub bound: Bound,
    /// Directory holding `convergence.csv` and the JSON outputs.
    pub data_dir: PathBuf,
    pub strategy: SieveStrategy,
    /// When false, compute mode prints the summary and writes nothing.
    pub write_outputs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            mode: Mode::Compute,
            bound: Bound::default(),
            data_dir: PathBuf::from("data"),
            strategy: SieveStrategy::Sequential,
            write_outputs: true,
        }
    }
}

impl RunConfig {
    /// Build a config from command-line arguments (program name excluded).
    ///
    /// Recognised: `--mode=compute|figures`, `--bound=N`, `--data-dir=PATH`,
    /// `--parallel`, `--segment-len=N`, `--no-write`. Arguments are checked
    /// left to right and the first bad one is reported. Each option may
    /// appear at most once.
    pub fn from_args(args: &[String]) -> Result<Self, SeriesError> {
        let mut config = RunConfig::default();
        let mut seen = HashSet::new();
        let mut parallel = false;
        let mut segment_len = None;

        for arg in args {
            let (key, value) = split_option(arg)?;
            if !seen.insert(key) {
                return Err(SeriesError::DuplicateOption(format!("--{key}")));
            }

            match (key, value) {
                ("mode", Some("compute")) => config.mode = Mode::Compute,
                ("mode", Some("figures")) => config.mode = Mode::Figures,
                ("bound", Some(v)) => config.bound = v.parse()?,
                ("data-dir", Some(v)) => config.data_dir = PathBuf::from(v),
                ("no-write", None) => config.write_outputs = false,
                ("parallel", None) => parallel = true,
                ("segment-len", Some(v)) => {
                    let len = v
                        .parse::<usize>()
                        .map_err(|_| SeriesError::UnknownOption(arg.clone()))?;
                    segment_len = Some(len);
                }
                _ => return Err(SeriesError::UnknownOption(arg.clone())),
            }
        }

        if parallel || segment_len.is_some() {
            config.strategy = SieveStrategy::Segmented {
                segment_len: segment_len.unwrap_or(DEFAULT_SEGMENT_LEN),
            };
        }

        Ok(config)
    }
}

/// Split `--key=value` or `--flag` into its key and optional value.
fn split_option(arg: &str) -> Result<(&str, Option<&str>), SeriesError> {
    let Some(kv) = arg.strip_prefix("--") else {
        return Err(SeriesError::UnknownOption(arg.to_string()));
    };
    Ok(match kv.split_once('=') {
        Some((k, v)) => (k, Some(v)),
        None => (kv, None),
    })
}
