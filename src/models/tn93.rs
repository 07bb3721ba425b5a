// tn93.rs - Tamura-Nei (1993) distance

use crate::core::counts::count_mutations;
use crate::core::sites::{estimate_frequencies, select_sites, SiteSelection};
use crate::data::nucleotide::{A, C, G, T};
use crate::data::Alignment;
use crate::error::Result;
use super::rate_matrix::Tn93RateMatrix;
use super::traits::{
    clamp_distance, gamma_term, log_term, FittedModel, RateVariation, SubstitutionModel,
};

/// Separate rates for purine transitions, pyrimidine transitions and
/// transversions, with unequal base frequencies
#[derive(Debug, Clone, Default)]
pub struct Tn93Model {
    remove_gaps: bool,
}

impl Tn93Model {
    pub fn new(remove_gaps: bool) -> Self {
        Self { remove_gaps }
    }
}

impl SubstitutionModel for Tn93Model {
    fn name(&self) -> &'static str {
        "tn93"
    }

    fn description(&self) -> &'static str {
        "Tamura-Nei 1993"
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
        Ok(Box::new(FittedTn93::new(selection, pi, rates)))
    }
}

// 0/0 terms come from a base that never occurs; they vanish in the limit
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if numerator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[derive(Debug, Clone)]
pub struct FittedTn93 {
    selection: SiteSelection,
    pi: [f64; 4],
    purines: f64,
    pyrimidines: f64,
    k: [f64; 3],
    rates: RateVariation,
}

impl FittedTn93 {
    fn new(selection: SiteSelection, pi: [f64; 4], rates: RateVariation) -> Self {
        let purines = pi[A] + pi[G];
        let pyrimidines = pi[C] + pi[T];
        let ag = pi[A] * pi[G];
        let ct = pi[C] * pi[T];
        let k = [
            ratio(2.0 * ag, purines),
            ratio(2.0 * ct, pyrimidines),
            2.0 * (purines * pyrimidines
                - ratio(ag * pyrimidines, purines)
                - ratio(ct * purines, pyrimidines)),
        ];
        Self {
            selection,
            pi,
            purines,
            pyrimidines,
            k,
            rates,
        }
    }

    /// Distance from purine transition (`p1`), pyrimidine transition (`p2`)
    /// and transversion (`q`) proportions
    pub fn distance_from_proportions(&self, p1: f64, p2: f64, q: f64) -> f64 {
        let [k1, k2, _] = self.k;
        let w = [
            1.0 - ratio(p1, k1) - ratio(q, 2.0 * self.purines),
            1.0 - ratio(p2, k2) - ratio(q, 2.0 * self.pyrimidines),
            1.0 - ratio(q, 2.0 * self.purines * self.pyrimidines),
        ];

        let mut dist = Some(0.0);
        for (k, w) in self.k.iter().zip(w) {
            if *k == 0.0 {
                continue;
            }
            let term = match self.rates {
                RateVariation::Uniform => log_term(w).map(|l| -k * l),
                RateVariation::Gamma { alpha } => gamma_term(w, alpha).map(|g| alpha * k * (g - 1.0)),
            };
            dist = dist.zip(term).map(|(d, t)| d + t);
        }
        clamp_distance(dist)
    }

    /// Rate matrix for the given rate ratios over the estimated frequencies
    pub fn rate_matrix(&self, kappa1: f64, kappa2: f64) -> Result<Tn93RateMatrix> {
        Tn93RateMatrix::new(kappa1, kappa2, self.pi)
    }
}

impl FittedModel for FittedTn93 {
    fn name(&self) -> &'static str {
        "tn93"
    }

    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64> {
        self.check_lengths(seq1, seq2, weights)?;
        let counts = count_mutations(seq1, seq2, self.selection.mask(), weights)?;
        if counts.total > 0.0 && counts.mismatches() == 0.0 {
            return Ok(0.0);
        }
        Ok(self.distance_from_proportions(
            counts.purine_transitions / counts.total,
            counts.pyrimidine_transitions / counts.total,
            counts.transversions / counts.total,
        ))
    }

    fn selection(&self) -> &SiteSelection {
        &self.selection
    }

    fn frequencies(&self) -> Option<[f64; 4]> {
        Some(self.pi)
    }
}
