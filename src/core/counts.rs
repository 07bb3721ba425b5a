// counts.rs - Weighted difference and substitution counters for sequence pairs

use crate::data::nucleotide::{classify, is_gap, Substitution};
use crate::data::weights::site_weight;
use crate::error::{DistError, Result};

/// Both sequences and the weights must cover every column of the mask
fn check_columns(seq1: &[u8], seq2: &[u8], mask: &[bool], weights: Option<&[f64]>) -> Result<()> {
    if seq1.len() != mask.len() || seq2.len() != mask.len() {
        return Err(DistError::alignment(format!(
            "sequences of length {} and {} compared over {} columns",
            seq1.len(),
            seq2.len(),
            mask.len()
        )));
    }
    if let Some(w) = weights.filter(|w| w.len() != mask.len()) {
        return Err(DistError::config(format!(
            "{} site weights given for {} columns",
            w.len(),
            mask.len()
        )));
    }
    Ok(())
}

/// Iterate over selected columns as (site, symbol1, symbol2)
fn selected_columns<'a>(
    seq1: &'a [u8],
    seq2: &'a [u8],
    mask: &'a [bool],
) -> impl Iterator<Item = (usize, u8, u8)> + 'a {
    seq1.iter()
        .zip(seq2)
        .zip(mask)
        .enumerate()
        .filter(|(_, (_, selected))| **selected)
        .map(|(site, ((&a, &b), _))| (site, a, b))
}

/// Mismatches among selected columns where neither sequence has a gap.
/// Returns (weighted mismatches, weighted compared columns).
pub fn count_diffs(
    seq1: &[u8],
    seq2: &[u8],
    mask: &[bool],
    weights: Option<&[f64]>,
) -> Result<(f64, f64)> {
    check_columns(seq1, seq2, mask, weights)?;
    let mut diffs = 0.0;
    let mut total = 0.0;

    for (site, a, b) in selected_columns(seq1, seq2, mask) {
        if is_gap(a) || is_gap(b) {
            continue;
        }
        let w = site_weight(weights, site);
        if a != b {
            diffs += w;
        }
        total += w;
    }

    Ok((diffs, total))
}

/// Like [`count_diffs`], but a gap facing a base counts as one mutation.
/// Columns with a gap in both sequences are skipped.
pub fn count_diffs_with_gaps(
    seq1: &[u8],
    seq2: &[u8],
    mask: &[bool],
    weights: Option<&[f64]>,
) -> Result<(f64, f64)> {
    check_columns(seq1, seq2, mask, weights)?;
    let mut diffs = 0.0;
    let mut total = 0.0;

    for (site, a, b) in selected_columns(seq1, seq2, mask) {
        if is_gap(a) && is_gap(b) {
            continue;
        }
        let w = site_weight(weights, site);
        if a != b {
            diffs += w;
        }
        total += w;
    }

    Ok((diffs, total))
}

/// First and last non-gap positions of a sequence
fn residue_span(seq: &[u8]) -> Option<(usize, usize)> {
    let first = seq.iter().position(|&s| !is_gap(s))?;
    let last = seq.iter().rposition(|&s| !is_gap(s))?;
    Some((first, last))
}

fn is_terminal_gap(symbol: u8, site: usize, span: Option<(usize, usize)>) -> bool {
    is_gap(symbol)
        && span.map_or(true, |(first, last)| site < first || site > last)
}

/// Like [`count_diffs_with_gaps`], but leading and trailing gap runs of
/// either sequence are left out entirely; only internal gaps count.
pub fn count_diffs_with_internal_gaps(
    seq1: &[u8],
    seq2: &[u8],
    mask: &[bool],
    weights: Option<&[f64]>,
) -> Result<(f64, f64)> {
    check_columns(seq1, seq2, mask, weights)?;
    let span1 = residue_span(seq1);
    let span2 = residue_span(seq2);
    let mut diffs = 0.0;
    let mut total = 0.0;

    for (site, a, b) in selected_columns(seq1, seq2, mask) {
        if (is_gap(a) && is_gap(b))
            || is_terminal_gap(a, site, span1)
            || is_terminal_gap(b, site, span2)
        {
            continue;
        }
        let w = site_weight(weights, site);
        if a != b {
            diffs += w;
        }
        total += w;
    }

    Ok((diffs, total))
}

/// Weighted substitution tallies over columns where both bases are A, C, G or T
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MutationCounts {
    /// A <-> G
    pub purine_transitions: f64,
    /// C <-> T
    pub pyrimidine_transitions: f64,
    pub transversions: f64,
    /// Weighted number of compared columns
    pub total: f64,
}

impl MutationCounts {
    pub fn transitions(&self) -> f64 {
        self.purine_transitions + self.pyrimidine_transitions
    }

    pub fn mismatches(&self) -> f64 {
        self.transitions() + self.transversions
    }
}

/// Classify every selected, unambiguous column as identical, transition or transversion
pub fn count_mutations(
    seq1: &[u8],
    seq2: &[u8],
    mask: &[bool],
    weights: Option<&[f64]>,
) -> Result<MutationCounts> {
    check_columns(seq1, seq2, mask, weights)?;
    let mut counts = MutationCounts::default();

    for (site, a, b) in selected_columns(seq1, seq2, mask) {
        let Some(kind) = classify(a, b) else {
            continue;
        };
        let w = site_weight(weights, site);
        match kind {
            Substitution::Identical => {}
            Substitution::PurineTransition => counts.purine_transitions += w,
            Substitution::PyrimidineTransition => counts.pyrimidine_transitions += w,
            Substitution::Transversion => counts.transversions += w,
        }
        counts.total += w;
    }

    Ok(counts)
}
