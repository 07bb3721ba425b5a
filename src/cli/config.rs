// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use crate::error::{DistError, Result};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub alignment: Option<String>,
    pub output: Option<String>,
    pub weights: Option<String>,
    pub format: Option<String>,

    // Model
    pub model: Option<String>,
    pub remove_gaps: Option<bool>,
    pub gamma: Option<f64>,
    pub count_gap_mutations: Option<i64>,

    // Performance
    pub threads: Option<usize>,
    pub progress: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            DistError::config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content).map_err(|e| {
            DistError::config(format!("Failed to parse config file '{}': {}", path.display(), e))
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| DistError::config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# ntdist.toml - Configuration file for ntdist
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Aligned FASTA file
alignment = "/path/to/alignment.fasta"

# Output distance matrix file ("-" for stdout)
output = "distances.dist"

# Output format: dist, tsv, csv, phylip
format = "dist"

# Per-site weights file (one non-negative number per alignment column)
# weights = "weights.txt"

# =============================================================================
# MODEL
# =============================================================================

# Substitution model: pdist, jc, k2p, f81, f84, tn93
model = "k2p"

# Ignore every column containing a gap in any sequence
remove_gaps = false

# Gamma rate heterogeneity shape parameter (omit for uniform rates)
# gamma = 0.5

# pdist gap counting: 0 ignore, 1 count gap vs base, 2 count internal gaps only
count_gap_mutations = 0

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 8

# Show a progress bar while computing
progress = false
"#
        .to_string()
    }
}
