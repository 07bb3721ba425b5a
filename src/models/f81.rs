// f81.rs - Felsenstein (1981) distance

use crate::core::counts::count_mutations;
use crate::core::sites::{estimate_frequencies, select_sites, SiteSelection};
use crate::data::Alignment;
use crate::error::Result;
use super::traits::{
    clamp_distance, gamma_term, log_term, FittedModel, RateVariation, SubstitutionModel,
};

/// Equal rates, unequal stationary frequencies.
///
/// d = -B ln(1 - p/B) with B = 1 - sum(pi_i^2).
#[derive(Debug, Clone, Default)]
pub struct F81Model {
    remove_gaps: bool,
}

impl F81Model {
    pub fn new(remove_gaps: bool) -> Self {
        Self { remove_gaps }
    }
}

impl SubstitutionModel for F81Model {
    fn name(&self) -> &'static str {
        "f81"
    }

    fn description(&self) -> &'static str {
        "Felsenstein 1981"
    }

    fn remove_gaps(&self) -> bool {
        self.remove_gaps
    }

    fn init_model(
        &self,
        alignment: &Alignment,
        weights: Option<&[f64]>,
        rates: RateVariation,
    ) -> Result<Box<dyn FittedModel>> {
        let selection = select_sites(alignment, weights, self.remove_gaps)?;
        let pi = estimate_frequencies(alignment, &selection, weights)?;
        let b = 1.0 - pi.iter().map(|f| f * f).sum::<f64>();
        Ok(Box::new(FittedF81 {
            selection,
            pi,
            b,
            rates,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct FittedF81 {
    selection: SiteSelection,
    pi: [f64; 4],
    b: f64,
    rates: RateVariation,
}

impl FittedF81 {
    /// Expected proportion of differences at equilibrium, 1 - sum(pi^2)
    pub fn b(&self) -> f64 {
        self.b
    }

    fn distance_from_proportion(&self, p: f64) -> f64 {
        let x = 1.0 - p / self.b;
        let dist = match self.rates {
            RateVariation::Uniform => log_term(x).map(|l| -self.b * l),
            RateVariation::Gamma { alpha } => {
                gamma_term(x, alpha).map(|g| self.b * alpha * (g - 1.0))
            }
        };
        clamp_distance(dist)
    }
}

impl FittedModel for FittedF81 {
    fn name(&self) -> &'static str {
        "f81"
    }

    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64> {
        self.check_lengths(seq1, seq2, weights)?;
        let counts = count_mutations(seq1, seq2, self.selection.mask(), weights)?;
        if counts.total > 0.0 && counts.mismatches() == 0.0 {
            return Ok(0.0);
        }
        Ok(self.distance_from_proportion(counts.mismatches() / counts.total))
    }

    fn selection(&self) -> &SiteSelection {
        &self.selection
    }

    fn frequencies(&self) -> Option<[f64; 4]> {
        Some(self.pi)
    }
}
