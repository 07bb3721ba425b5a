// traits.rs - Core traits and types for the substitution model system

use std::fmt::{Debug, Display};
use std::str::FromStr;
use crate::core::sites::SiteSelection;
use crate::data::{validate_weights, Alignment};
use crate::error::{DistError, Result};

/// Distance reported when observed divergence is beyond model saturation
pub const NT_DIST_MAX: f64 = 5.0;

/// How the p-distance treats a gap facing a base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapCountMode {
    /// Columns with a gap in either sequence are ignored (mode 0)
    #[default]
    Ignore,
    /// Gap vs base counts as one mutation everywhere (mode 1)
    All,
    /// Gap vs base counts as one mutation, internal gaps only (mode 2)
    Internal,
}

impl GapCountMode {
    pub fn code(&self) -> i64 {
        match self {
            GapCountMode::Ignore => 0,
            GapCountMode::All => 1,
            GapCountMode::Internal => 2,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            GapCountMode::Ignore => "gap columns ignored",
            GapCountMode::All => "gap vs base counted as a mutation",
            GapCountMode::Internal => "internal gap vs base counted as a mutation",
        }
    }
}

impl TryFrom<i64> for GapCountMode {
    type Error = DistError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(GapCountMode::Ignore),
            1 => Ok(GapCountMode::All),
            2 => Ok(GapCountMode::Internal),
            _ => Err(DistError::config(format!(
                "Gap count mode not available: {}. Use: 0, 1, 2",
                code
            ))),
        }
    }
}

impl FromStr for GapCountMode {
    type Err = DistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ignore" | "none" => Ok(GapCountMode::Ignore),
            "all" => Ok(GapCountMode::All),
            "internal" => Ok(GapCountMode::Internal),
            other => other
                .parse::<i64>()
                .map_err(|_| DistError::config(format!("Invalid gap count mode: {}", s)))
                .and_then(GapCountMode::try_from),
        }
    }
}

/// Rate variation across sites
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RateVariation {
    /// Every site evolves at the same rate
    #[default]
    Uniform,
    /// Gamma-distributed rates with shape `alpha`
    Gamma { alpha: f64 },
}

impl RateVariation {
    /// Build from a gamma switch and its shape parameter
    pub fn from_flag(gamma: bool, alpha: f64) -> Result<Self> {
        if !gamma {
            return Ok(RateVariation::Uniform);
        }
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(DistError::config(format!(
                "Gamma shape parameter must be a positive real, got {}",
                alpha
            )));
        }
        Ok(RateVariation::Gamma { alpha })
    }

    pub fn alpha(&self) -> Option<f64> {
        match self {
            RateVariation::Uniform => None,
            RateVariation::Gamma { alpha } => Some(*alpha),
        }
    }
}

impl Display for RateVariation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateVariation::Uniform => write!(f, "uniform"),
            RateVariation::Gamma { alpha } => write!(f, "gamma(alpha={})", alpha),
        }
    }
}

/// Options shared by every model constructor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelOptions {
    /// Drop columns with a gap in any sequence
    pub remove_gaps: bool,
    /// Only used by the p-distance
    pub gap_count: GapCountMode,
}

impl ModelOptions {
    pub fn new(remove_gaps: bool) -> Self {
        Self {
            remove_gaps,
            gap_count: GapCountMode::default(),
        }
    }

    pub fn with_gap_count(mut self, gap_count: GapCountMode) -> Self {
        self.gap_count = gap_count;
        self
    }
}

/// A configured, not yet initialized substitution model.
///
/// `init_model` estimates the model parameters from an alignment and
/// returns a frozen snapshot; calling it again recomputes everything.
pub trait SubstitutionModel: Send + Sync + Debug {
    /// Short name as used on the command line
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    fn remove_gaps(&self) -> bool;

    /// Estimate parameters and freeze them into a [`FittedModel`]
    fn init_model(
        &self,
        alignment: &Alignment,
        weights: Option<&[f64]>,
        rates: RateVariation,
    ) -> Result<Box<dyn FittedModel>>;
}

/// An initialized model. `distance` never mutates the snapshot, so one
/// instance can be shared by every worker of the matrix engine.
pub trait FittedModel: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Estimate the evolutionary distance between two aligned sequences
    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64>;

    /// Columns the model was fitted on
    fn selection(&self) -> &SiteSelection;

    /// Stationary A,C,G,T frequencies, for models that estimate them
    fn frequencies(&self) -> Option<[f64; 4]> {
        None
    }

    /// Check that both sequences and the site weights match the fitted
    /// alignment length
    fn check_lengths(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<()> {
        let expected = self.selection().len();
        if seq1.len() != expected || seq2.len() != expected {
            return Err(DistError::alignment(format!(
                "sequences of length {} and {} given to a model fitted on {} sites",
                seq1.len(),
                seq2.len(),
                expected
            )));
        }
        validate_weights(weights, expected)
    }
}

/// `ln(x)` for a valid log argument, `None` past saturation
#[inline]
pub(crate) fn log_term(x: f64) -> Option<f64> {
    (x.is_finite() && x > 0.0).then(|| x.ln())
}

/// `x^(-1/alpha)` for a valid argument, `None` past saturation
#[inline]
pub(crate) fn gamma_term(x: f64, alpha: f64) -> Option<f64> {
    (x.is_finite() && x > 0.0).then(|| x.powf(-1.0 / alpha))
}

/// Apply the saturation policy to a raw model distance: undefined or
/// infinite values become [`NT_DIST_MAX`], non-positive values become 0.
#[inline]
pub(crate) fn clamp_distance(dist: Option<f64>) -> f64 {
    match dist {
        Some(d) if d.is_finite() => {
            if d > 0.0 {
                d
            } else {
                0.0
            }
        }
        _ => NT_DIST_MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_count_mode() {
        assert_eq!(GapCountMode::try_from(0).unwrap(), GapCountMode::Ignore);
        assert_eq!(GapCountMode::try_from(1).unwrap(), GapCountMode::All);
        assert_eq!(GapCountMode::try_from(2).unwrap(), GapCountMode::Internal);
        assert!(GapCountMode::try_from(3).unwrap_err().is_config());
        assert!(GapCountMode::try_from(-1).is_err());

        assert_eq!("internal".parse::<GapCountMode>().unwrap(), GapCountMode::Internal);
        assert_eq!("1".parse::<GapCountMode>().unwrap(), GapCountMode::All);
        assert!("7".parse::<GapCountMode>().is_err());
        assert!("bogus".parse::<GapCountMode>().is_err());
        assert_eq!(GapCountMode::Internal.code(), 2);
    }

    #[test]
    fn test_rate_variation() {
        assert_eq!(RateVariation::from_flag(false, -3.0).unwrap(), RateVariation::Uniform);
        assert_eq!(
            RateVariation::from_flag(true, 0.5).unwrap(),
            RateVariation::Gamma { alpha: 0.5 }
        );
        assert!(RateVariation::from_flag(true, 0.0).is_err());
        assert!(RateVariation::from_flag(true, f64::INFINITY).is_err());
        assert_eq!(RateVariation::Gamma { alpha: 2.0 }.alpha(), Some(2.0));
        assert_eq!(RateVariation::Uniform.to_string(), "uniform");
    }

    #[test]
    fn test_saturation_helpers() {
        assert_eq!(log_term(1.0), Some(0.0));
        assert_eq!(log_term(0.0), None);
        assert_eq!(log_term(-0.2), None);
        assert_eq!(log_term(f64::NAN), None);
        assert_eq!(gamma_term(1.0, 0.5), Some(1.0));
        assert_eq!(gamma_term(-1.0, 0.5), None);

        assert_eq!(clamp_distance(None), NT_DIST_MAX);
        assert_eq!(clamp_distance(Some(f64::INFINITY)), NT_DIST_MAX);
        assert_eq!(clamp_distance(Some(f64::NAN)), NT_DIST_MAX);
        assert_eq!(clamp_distance(Some(-0.0)), 0.0);
        assert_eq!(clamp_distance(Some(0.25)), 0.25);
    }
}
