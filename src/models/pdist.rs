// pdist.rs - Proportion of differing sites

use crate::core::counts::{count_diffs, count_diffs_with_gaps, count_diffs_with_internal_gaps};
use crate::core::sites::{select_sites, SiteSelection};
use crate::data::Alignment;
use crate::error::Result;
use super::traits::{FittedModel, GapCountMode, RateVariation, SubstitutionModel, NT_DIST_MAX};

/// Uncorrected p-distance
#[derive(Debug, Clone, Default)]
pub struct PDistModel {
    remove_gaps: bool,
    gap_count: GapCountMode,
}

impl PDistModel {
    pub fn new(remove_gaps: bool) -> Self {
        Self {
            remove_gaps,
            gap_count: GapCountMode::Ignore,
        }
    }

    pub fn with_gap_count(mut self, gap_count: GapCountMode) -> Self {
        self.gap_count = gap_count;
        self
    }

    /// Set the gap count mode from its numeric code (0, 1 or 2)
    pub fn set_count_gap_mutations(&mut self, code: i64) -> Result<()> {
        self.gap_count = GapCountMode::try_from(code)?;
        Ok(())
    }

    pub fn gap_count(&self) -> GapCountMode {
        self.gap_count
    }
}

impl SubstitutionModel for PDistModel {
    fn name(&self) -> &'static str {
        "pdist"
    }

    fn description(&self) -> &'static str {
        "Proportion of differing sites (no correction)"
    }

    fn remove_gaps(&self) -> bool {
        self.remove_gaps
    }

    // Rate variation does not apply to an uncorrected proportion
    fn init_model(
        &self,
        alignment: &Alignment,
        weights: Option<&[f64]>,
        _rates: RateVariation,
    ) -> Result<Box<dyn FittedModel>> {
        let selection = select_sites(alignment, weights, self.remove_gaps)?;
        Ok(Box::new(FittedPDist {
            selection,
            gap_count: self.gap_count,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct FittedPDist {
    selection: SiteSelection,
    gap_count: GapCountMode,
}

impl FittedModel for FittedPDist {
    fn name(&self) -> &'static str {
        "pdist"
    }

    fn distance(&self, seq1: &[u8], seq2: &[u8], weights: Option<&[f64]>) -> Result<f64> {
        self.check_lengths(seq1, seq2, weights)?;
        let mask = self.selection.mask();

        let (diffs, total) = match self.gap_count {
            GapCountMode::Ignore => count_diffs(seq1, seq2, mask, weights),
            GapCountMode::All => count_diffs_with_gaps(seq1, seq2, mask, weights),
            GapCountMode::Internal => count_diffs_with_internal_gaps(seq1, seq2, mask, weights),
        }?;

        if total > 0.0 {
            Ok(diffs / total)
        } else {
            Ok(NT_DIST_MAX)
        }
    }

    fn selection(&self) -> &SiteSelection {
        &self.selection
    }
}
