use courserec_core::SelfComparison;
use serde::Deserialize;
use std::path::PathBuf;

/// Defaults read from `COURSEREC_*` environment variables (and an optional `.env` file).
/// Command line flags take precedence.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the preset domain tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Number of recommendations when no flag or preset supplies one
    #[serde(default)]
    pub top_n: Option<usize>,

    /// Whether the anchor course may appear in its own ranking
    #[serde(default)]
    pub self_comparison: SelfComparison,

    /// Field delimiter of input tables
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Log filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_delimiter() -> char {
    ','
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("COURSEREC_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
