// f84.rs - Felsenstein (1984) distance

use crate::core::counts::count_mutations;
use crate::core::sites::{estimate_frequencies, select_sites, SiteSelection};
use crate::data::nucleotide::{A, C, G, T};
use crate::data::Alignment;
use crate::error::Result;
use super::traits::{
    clamp_distance, gamma_term, log_term, FittedModel, RateVariation, SubstitutionModel,
};

/// Unequal base frequencies with a transition/transversion bias.
///
/// Parameters derived from the stationary frequencies:
/// - a = piA*piG/piR + piC*piT/piY
/// - b = piA*piG + piC*piT
/// - c = piR*piY
#[derive(Debug, Clone, Default)]
pub struct F84Model {
    remove_gaps: bool,
}

impl F84Model {
    pub fn new(remove_gaps: bool) -> Self {
        Self { remove_gaps }
    }
}

impl SubstitutionModel for F84Model {
    fn name(&self) -> &'static str {
        "f84"
    }

    fn description(&self) -> &'static str {
        "Felsenstein 1984"
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
        Ok(Box::new(FittedF84::new(selection, pi, rates)))
    }
}

#[derive(Debug, Clone)]
pub struct FittedF84 {
    selection: SiteSelection,
    pi: [f64; 4],
    a: f64,
    b: f64,
    c: f64,
    rates: RateVariation,
}

impl FittedF84 {
    fn new(selection: SiteSelection, pi: [f64; 4], rates: RateVariation) -> Self {
        let purines = pi[A] + pi[G];
        let pyrimidines = pi[C] + pi[T];
        Self {
            selection,
            pi,
            a: pi[A] * pi[G] / purines + pi[C] * pi[T] / pyrimidines,
            b: pi[A] * pi[G] + pi[C] * pi[T],
            c: purines * pyrimidines,
            rates,
        }
    }

    /// The (a, b, c) parameters
    pub fn parameters(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Distance from transition (`p`) and transversion (`q`) proportions
    pub fn distance_from_proportions(&self, p: f64, q: f64) -> f64 {
        let (a, b, c) = (self.a, self.b, self.c);
        let x = 1.0 - p / (2.0 * a) - (a - b) * q / (2.0 * a * c);
        let y = 1.0 - q / (2.0 * c);

        let dist = match self.rates {
            RateVariation::Uniform => log_term(x)
                .zip(log_term(y))
                .map(|(lx, ly)| -2.0 * a * lx + 2.0 * (a - b - c) * ly),
            RateVariation::Gamma { alpha } => gamma_term(x, alpha)
                .zip(gamma_term(y, alpha))
                .map(|(gx, gy)| 2.0 * alpha * (a * gx + (b + c - a) * gy - b - c)),
        };
        clamp_distance(dist)
    }
}

impl FittedModel for FittedF84 {
    fn name(&self) -> &'static str {
        "f84"
    }

    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64> {
        self.check_lengths(seq1, seq2, weights)?;
        let counts = count_mutations(seq1, seq2, self.selection.mask(), weights)?;
        if counts.total > 0.0 && counts.mismatches() == 0.0 {
            return Ok(0.0);
        }
        let p = counts.transitions() / counts.total;
        let q = counts.transversions / counts.total;
        Ok(self.distance_from_proportions(p, q))
    }

    fn selection(&self) -> &SiteSelection {
        &self.selection
    }

    fn frequencies(&self) -> Option<[f64; 4]> {
        Some(self.pi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::k2p::k2p_distance;
    use crate::models::traits::NT_DIST_MAX;
    use approx::assert_abs_diff_eq;

    fn balanced() -> Alignment {
        Alignment::from_pairs([
            ("a", "ACGTACGTACGTACGTACGT"),
            ("b", "GCTAACGTACGTACGTACGT"),
            ("c", "TGCATGCATGCATGCATGCA"),
        ])
        .unwrap()
    }

    #[test]
    fn test_parameters() {
        let aln = Alignment::from_pairs([("a", "AACGTTTT"), ("b", "GACGTTCA")]).unwrap();
        let m = F84Model::new(false)
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        let pi = m.frequencies().unwrap();
        let (a_, c_, g_, t_) = (pi[0], pi[1], pi[2], pi[3]);
        let f84 = FittedF84::new(m.selection().clone(), pi, RateVariation::Uniform);
        let (a, b, c) = f84.parameters();
        assert_abs_diff_eq!(a, a_ * g_ / (a_ + g_) + c_ * t_ / (c_ + t_), epsilon = 1e-12);
        assert_abs_diff_eq!(b, a_ * g_ + c_ * t_, epsilon = 1e-12);
        assert_abs_diff_eq!(c, (a_ + g_) * (c_ + t_), epsilon = 1e-12);
    }

    #[test]
    fn test_equal_frequencies_match_k2p() {
        let aln = balanced();
        let m = F84Model::new(false)
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        let pi = m.frequencies().unwrap();
        for f in pi {
            assert_abs_diff_eq!(f, 0.25, epsilon = 1e-12);
        }
        // One transition (A/G) and two transversions (G/T, T/A) out of 20 sites
        let d = m.distance(aln.sequence(0).unwrap(), aln.sequence(1).unwrap(), None).unwrap();
        assert_abs_diff_eq!(d, k2p_distance(0.05, 0.1, RateVariation::Uniform), epsilon = 1e-12);
    }

    #[test]
    fn test_gamma() {
        let aln = balanced();
        let gamma = RateVariation::Gamma { alpha: 0.8 };
        let m = F84Model::new(false).init_model(&aln, None, gamma).unwrap();
        let d = m.distance(aln.sequence(0).unwrap(), aln.sequence(1).unwrap(), None).unwrap();
        assert_abs_diff_eq!(d, k2p_distance(0.05, 0.1, gamma), epsilon = 1e-12);
        assert!(d > k2p_distance(0.05, 0.1, RateVariation::Uniform));
    }

    #[test]
    fn test_identical_sequences() {
        let aln = balanced();
        let m = F84Model::new(false)
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        let s = aln.sequence(2).unwrap();
        assert_eq!(m.distance(s, s, None).unwrap(), 0.0);
    }

    #[test]
    fn test_saturation_clamp() {
        // No shared base at any site
        let aln = balanced();
        let m = F84Model::new(false)
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        let d = m.distance(aln.sequence(0).unwrap(), aln.sequence(2).unwrap(), None).unwrap();
        assert_eq!(d, NT_DIST_MAX);

        let gamma = RateVariation::Gamma { alpha: 1.0 };
        let m = F84Model::new(false).init_model(&aln, None, gamma).unwrap();
        let d = m.distance(aln.sequence(0).unwrap(), aln.sequence(2).unwrap(), None).unwrap();
        assert_eq!(d, NT_DIST_MAX);
    }

    #[test]
    fn test_missing_pyrimidines_saturate() {
        let aln = Alignment::from_pairs([("a", "AAAA"), ("b", "GGGG")]).unwrap();
        let m = F84Model::new(false)
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        let d = m.distance(b"AAAA", b"GGGG", None).unwrap();
        assert_eq!(d, NT_DIST_MAX);
        assert!(!d.is_nan());
    }
}
