// validation.rs - Input validation utilities

use std::path::Path;
use crate::cli::args::Args;
use crate::core::DistanceEngine;
use crate::error::{DistError, Result};
use crate::models::{GapCountMode, ModelOptions, ModelRegistry, RateVariation, SubstitutionModel};
use crate::output::{is_stdout, OutputFormat};

/// Model used when neither the command line nor the config names one
pub const DEFAULT_MODEL: &str = "k2p";

#[derive(Debug)]
pub struct ValidationResult {
    pub model: Box<dyn SubstitutionModel>,
    pub rates: RateVariation,
    pub gap_count: GapCountMode,
    pub format: OutputFormat,
    pub engine: DistanceEngine,
    pub output: String,
}

/// Validate all command line arguments before any input is read
pub fn validate_args(args: &Args) -> Result<ValidationResult> {
    let alignment = args
        .alignment
        .as_deref()
        .ok_or_else(|| DistError::config("--alignment is required"))?;
    if !Path::new(alignment).is_file() {
        return Err(DistError::config(format!("Alignment file not found: {}", alignment)));
    }
    if let Some(weights) = &args.weights {
        if !Path::new(weights).is_file() {
            return Err(DistError::config(format!("Weights file not found: {}", weights)));
        }
    }

    // Validate gap counting mode and model name
    let gap_count = GapCountMode::try_from(args.count_gap_mutations.unwrap_or(0))?;
    let options = ModelOptions::new(args.remove_gaps).with_gap_count(gap_count);
    let model_name = args.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let model = ModelRegistry::new().build(model_name, &options)?;

    let rates = match args.gamma {
        Some(alpha) => RateVariation::from_flag(true, alpha)?,
        None => RateVariation::Uniform,
    };

    let engine = match args.threads {
        Some(n) => DistanceEngine::new(n)?,
        None => DistanceEngine::with_available_parallelism(),
    }
    .with_progress(args.progress);

    let format = match args.format.as_deref() {
        Some(name) => name.parse()?,
        None => OutputFormat::default(),
    };

    let output = match args.output.as_deref() {
        Some(path) if !is_stdout(path) => path.to_string(),
        _ => "-".to_string(),
    };

    Ok(ValidationResult {
        model,
        rates,
        gap_count,
        format,
        engine,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;
    use tempfile::NamedTempFile;

    fn parse(alignment: &Path, extra: &[&str]) -> Args {
        let path = alignment.to_str().unwrap();
        let mut argv = vec!["--alignment", path];
        argv.extend_from_slice(extra);
        Args::from_args(&["ntdist"], &argv).unwrap()
    }

    #[test]
    fn test_valid_args() {
        let file = NamedTempFile::new().unwrap();
        let args = parse(file.path(), &["--model", "TN93", "--gamma", "0.5", "--threads", "3"]);
        let result = validate_args(&args).unwrap();
        assert_eq!(result.model.name(), "tn93");
        assert_eq!(result.rates, RateVariation::Gamma { alpha: 0.5 });
        assert_eq!(result.engine.threads(), 3);
        assert_eq!(result.format, OutputFormat::Dist);
        assert_eq!(result.output, "-");
    }

    #[test]
    fn test_defaults_when_unset() {
        let file = NamedTempFile::new().unwrap();
        let result = validate_args(&parse(file.path(), &[])).unwrap();
        assert_eq!(result.model.name(), DEFAULT_MODEL);
        assert_eq!(result.gap_count, GapCountMode::Ignore);
        assert_eq!(result.format, OutputFormat::Dist);
        assert_eq!(result.rates, RateVariation::Uniform);
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let file = NamedTempFile::new().unwrap();
        let cases: [&[&str]; 5] = [
            &["--model", "gtr"],
            &["--count-gap-mutations", "3"],
            &["--threads", "0"],
            &["--gamma", "0"],
            &["--format", "nexus"],
        ];
        for extra in cases {
            let err = validate_args(&parse(file.path(), extra)).unwrap_err();
            assert!(err.is_config(), "{:?} gave {}", extra, err);
        }
    }

    #[test]
    fn test_missing_inputs() {
        let args = Args::from_args(&["ntdist"], &[]).unwrap();
        assert!(validate_args(&args).unwrap_err().is_config());

        let args = Args::from_args(&["ntdist"], &["--alignment", "/nonexistent/aln.fa"]).unwrap();
        assert!(validate_args(&args).unwrap_err().is_config());

        let file = NamedTempFile::new().unwrap();
        let args = parse(file.path(), &["--weights", "/nonexistent/weights.txt"]);
        assert!(validate_args(&args).unwrap_err().is_config());
    }
}
