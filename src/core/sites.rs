// sites.rs - Site selection and stationary frequency estimation

use std::sync::Arc;
use crate::data::nucleotide::{base_index, N_STATES};
use crate::data::weights::{site_weight, validate_weights};
use crate::data::Alignment;
use crate::error::{DistError, Result};

/// Columns taking part in distance estimation.
///
/// The mask is shared read-only between a fitted model and the workers of
/// the matrix engine, so it is stored behind an `Arc` and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSelection {
    num_sites: f64,
    mask: Arc<[bool]>,
}

impl SiteSelection {
    /// Weighted number of selected columns
    pub fn num_sites(&self) -> f64 {
        self.num_sites
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Alignment length the mask was computed for
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn is_selected(&self, site: usize) -> bool {
        self.mask.get(site).copied().unwrap_or(false)
    }

    /// Count of selected columns, ignoring weights
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&s| s).count()
    }
}

/// Select the columns usable for distance estimation.
///
/// With `remove_gaps`, a column is dropped when any sequence has a gap in it.
pub fn select_sites(
    alignment: &Alignment,
    weights: Option<&[f64]>,
    remove_gaps: bool,
) -> Result<SiteSelection> {
    validate_weights(weights, alignment.length())?;

    let mask: Vec<bool> = (0..alignment.length())
        .map(|site| !(remove_gaps && alignment.column_has_gap(site)))
        .collect();

    let num_sites: f64 = mask
        .iter()
        .enumerate()
        .filter(|(_, selected)| **selected)
        .map(|(site, _)| site_weight(weights, site))
        .sum();

    Ok(SiteSelection {
        num_sites,
        mask: mask.into(),
    })
}

/// Estimate stationary A,C,G,T frequencies over the selected columns.
///
/// Gaps and ambiguity codes are not counted. Fails when no valid base remains.
pub fn estimate_frequencies(
    alignment: &Alignment,
    selection: &SiteSelection,
    weights: Option<&[f64]>,
) -> Result<[f64; N_STATES]> {
    validate_weights(weights, alignment.length())?;

    let mut counts = [0.0; N_STATES];
    for record in alignment.records() {
        for (site, &symbol) in record.sequence.iter().enumerate() {
            if !selection.is_selected(site) {
                continue;
            }
            if let Some(state) = base_index(symbol) {
                counts[state] += site_weight(weights, site);
            }
        }
    }

    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Err(DistError::estimation(
            "no valid nucleotide (A, C, G, T) in the selected sites",
        ));
    }

    Ok(counts.map(|c| c / total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gapped() -> Alignment {
        Alignment::from_pairs([
            ("s1", "AC-GTA"),
            ("s2", "ACGGTA"),
            ("s3", "ACGG-N"),
        ])
        .unwrap()
    }

    #[test]
    fn test_keep_all_sites() {
        let sel = select_sites(&gapped(), None, false).unwrap();
        assert_eq!(sel.mask(), &[true; 6]);
        assert_eq!(sel.num_sites(), 6.0);
        assert_eq!(sel.count(), 6);
    }

    #[test]
    fn test_remove_gap_columns() {
        let sel = select_sites(&gapped(), None, true).unwrap();
        assert_eq!(sel.mask(), &[true, true, false, true, false, true]);
        assert_eq!(sel.num_sites(), 4.0);
        assert!(!sel.is_selected(2));
        assert!(!sel.is_selected(99));
    }

    #[test]
    fn test_weighted_count() {
        let weights = [1.0, 2.0, 5.0, 0.5, 3.0, 0.0];
        let sel = select_sites(&gapped(), Some(&weights), true).unwrap();
        assert_abs_diff_eq!(sel.num_sites(), 3.5, epsilon = 1e-12);

        let sel = select_sites(&gapped(), Some(&weights), false).unwrap();
        assert_abs_diff_eq!(sel.num_sites(), 11.5, epsilon = 1e-12);

        assert!(select_sites(&gapped(), Some(&weights[..3]), true).is_err());
    }

    #[test]
    fn test_selection_ignores_sequence_order() {
        let aln = gapped();
        let mut records = aln.records().to_vec();
        records.reverse();
        let reversed = Alignment::new(records).unwrap();

        assert_eq!(
            select_sites(&aln, None, true).unwrap(),
            select_sites(&reversed, None, true).unwrap()
        );
    }

    #[test]
    fn test_frequencies() {
        let aln = Alignment::from_pairs([("s1", "AACG"), ("s2", "AATN")]).unwrap();
        let sel = select_sites(&aln, None, false).unwrap();
        let pi = estimate_frequencies(&aln, &sel, None).unwrap();

        // 4 A, 1 C, 1 G, 1 T; N ignored
        assert_abs_diff_eq!(pi[0], 4.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pi[1], 1.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pi[2], 1.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pi[3], 1.0 / 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pi.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weighted_frequencies_respect_mask() {
        let aln = gapped();
        let weights = [1.0, 1.0, 1.0, 2.0, 1.0, 1.0];
        let sel = select_sites(&aln, Some(&weights), true).unwrap();
        let pi = estimate_frequencies(&aln, &sel, Some(&weights)).unwrap();

        // Columns 0,1,3,5: A x3, C x3, G x3 (weight 2), A x2 + N
        let total = 3.0 + 3.0 + 6.0 + 2.0;
        assert_abs_diff_eq!(pi[0], 5.0 / total, epsilon = 1e-12);
        assert_abs_diff_eq!(pi[1], 3.0 / total, epsilon = 1e-12);
        assert_abs_diff_eq!(pi[2], 6.0 / total, epsilon = 1e-12);
        assert_abs_diff_eq!(pi[3], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pi.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frequencies_without_valid_bases() {
        let aln = Alignment::from_pairs([("s1", "NN-"), ("s2", "-RY")]).unwrap();
        let sel = select_sites(&aln, None, false).unwrap();
        let err = estimate_frequencies(&aln, &sel, None).unwrap_err();
        assert!(matches!(err, DistError::Estimation { .. }));

        let sel = select_sites(&aln, None, true).unwrap();
        assert_eq!(sel.count(), 0);
        assert!(estimate_frequencies(&aln, &sel, None).is_err());
    }
}
