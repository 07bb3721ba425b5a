// jc.rs - Jukes-Cantor (1969) distance

use crate::core::counts::count_mutations;
use crate::core::sites::{select_sites, SiteSelection};
use crate::data::Alignment;
use crate::error::Result;
use super::traits::{
    clamp_distance, gamma_term, log_term, FittedModel, RateVariation, SubstitutionModel,
};

/// Equal base frequencies and equal rates between all bases.
///
/// d = -3/4 ln(1 - 4p/3), with p the proportion of differing unambiguous sites.
#[derive(Debug, Clone, Default)]
pub struct JcModel {
    remove_gaps: bool,
}

impl JcModel {
    pub fn new(remove_gaps: bool) -> Self {
        Self { remove_gaps }
    }
}

impl SubstitutionModel for JcModel {
    fn name(&self) -> &'static str {
        "jc"
    }

    fn description(&self) -> &'static str {
        "Jukes-Cantor 1969"
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
        Ok(Box::new(FittedJc { selection, rates }))
    }
}

#[derive(Debug, Clone)]
pub struct FittedJc {
    selection: SiteSelection,
    rates: RateVariation,
}

/// JC distance for a mismatch proportion `p`
pub fn jc_distance(p: f64, rates: RateVariation) -> f64 {
    let x = 1.0 - 4.0 * p / 3.0;
    let dist = match rates {
        RateVariation::Uniform => log_term(x).map(|l| -0.75 * l),
        RateVariation::Gamma { alpha } => gamma_term(x, alpha).map(|g| 0.75 * alpha * (g - 1.0)),
    };
    clamp_distance(dist)
}

impl FittedModel for FittedJc {
    fn name(&self) -> &'static str {
        "jc"
    }

    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64> {
        self.check_lengths(seq1, seq2, weights)?;
        let counts = count_mutations(seq1, seq2, self.selection.mask(), weights)?;
        Ok(jc_distance(counts.mismatches() / counts.total, self.rates))
    }

    fn selection(&self) -> &SiteSelection {
        &self.selection
    }
}
