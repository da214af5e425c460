use serde::Deserialize;
use std::path::PathBuf;

use crate::concurrent::DedupMode;

pub const DEFAULT_OUTPUT: &str = "js_endpoints.txt";
pub const ENDPOINT_PROVENANCE: &str = "success.txt";
pub const PARAMS_OUTPUT: &str = "params.txt";
pub const PARAMS_PROVENANCE: &str = "success_params.txt";

/// Which artifact class a run extracts. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Endpoints,
    Parameters,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    /// Primary output file for endpoint mode.
    pub output: String,
    /// Directory all output files are placed in.
    pub out_dir: PathBuf,
    /// Echo the source URL alongside each console line.
    pub verbose: bool,
    pub workers: usize,
    pub dedup: DedupMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Endpoints,
            output: DEFAULT_OUTPUT.to_string(),
            out_dir: PathBuf::from("."),
            verbose: false,
            workers: 1,
            dedup: DedupMode::Locked,
        }
    }
}
