// k2p.rs - Kimura two-parameter (1980) distance

use crate::core::counts::count_mutations;
use crate::core::sites::{select_sites, SiteSelection};
use crate::data::Alignment;
use crate::error::Result;
use super::traits::{
    clamp_distance, gamma_term, log_term, FittedModel, RateVariation, SubstitutionModel,
};

/// Separate transition and transversion rates, equal base frequencies
#[derive(Debug, Clone, Default)]
pub struct K2pModel {
    remove_gaps: bool,
}

impl K2pModel {
    pub fn new(remove_gaps: bool) -> Self {
        Self { remove_gaps }
    }
}

impl SubstitutionModel for K2pModel {
    fn name(&self) -> &'static str {
        "k2p"
    }

    fn description(&self) -> &'static str {
        "Kimura 2-parameter 1980"
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
        Ok(Box::new(FittedK2p { selection, rates }))
    }
}

#[derive(Debug, Clone)]
pub struct FittedK2p {
    selection: SiteSelection,
    rates: RateVariation,
}

/// K2P distance from transition (`p`) and transversion (`q`) proportions
pub fn k2p_distance(p: f64, q: f64, rates: RateVariation) -> f64 {
    let x1 = 1.0 - 2.0 * p - q;
    let x2 = 1.0 - 2.0 * q;
    let dist = match rates {
        RateVariation::Uniform => {
            log_term(x1).zip(log_term(x2)).map(|(l1, l2)| -0.5 * l1 - 0.25 * l2)
        }
        RateVariation::Gamma { alpha } => gamma_term(x1, alpha)
            .zip(gamma_term(x2, alpha))
            .map(|(g1, g2)| 0.5 * alpha * (g1 + 0.5 * g2 - 1.5)),
    };
    clamp_distance(dist)
}

impl FittedModel for FittedK2p {
    fn name(&self) -> &'static str {
        "k2p"
    }

    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64> {
        self.check_lengths(seq1, seq2, weights)?;
        let counts = count_mutations(seq1, seq2, self.selection.mask(), weights)?;
        let p = counts.transitions() / counts.total;
        let q = counts.transversions / counts.total;
        Ok(k2p_distance(p, q, self.rates))
    }

    fn selection(&self) -> &SiteSelection {
        &self.selection
    }
}
