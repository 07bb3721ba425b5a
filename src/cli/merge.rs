// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};
use crate::error::Result;

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.alignment.is_none() {
            self.alignment = config.alignment;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.weights.is_none() {
            self.weights = config.weights;
        }

        // Core settings
        if self.model.is_none() {
            self.model = config.model;
        }
        if self.format.is_none() {
            self.format = config.format;
        }
        if self.count_gap_mutations.is_none() {
            self.count_gap_mutations = config.count_gap_mutations;
        }
        if self.gamma.is_none() {
            self.gamma = config.gamma;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.remove_gaps && config.remove_gaps.unwrap_or(false) {
            self.remove_gaps = true;
        }
        if !self.progress && config.progress.unwrap_or(false) {
            self.progress = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
