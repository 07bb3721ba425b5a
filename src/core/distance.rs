// distance.rs - Parallel pairwise distance matrix engine

use std::sync::atomic::{AtomicUsize, Ordering};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use crate::data::{validate_weights, Alignment};
use crate::error::{DistError, Result};
use crate::models::{FittedModel, RateVariation, SubstitutionModel};

/// Symmetric matrix of pairwise distances with a zero diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Build from upper-triangle cells `(i, j, d)` with `i < j`
    fn from_upper_triangle(names: Vec<String>, cells: Vec<(usize, usize, f64)>) -> Self {
        let n = names.len();
        let mut values = vec![vec![0.0; n]; n];
        for (i, j, d) in cells {
            values[i][j] = d;
            values[j][i] = d;
        }
        Self { names, values }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.values.get(i).map(|row| row.as_slice())
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Vec<f64>> {
        self.values
    }
}

/// Computes distance matrices on a dedicated rayon pool
#[derive(Debug, Clone)]
pub struct DistanceEngine {
    threads: usize,
    progress: bool,
}

impl DistanceEngine {
    /// Engine with a fixed number of worker threads (must be positive)
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(DistError::config("Parallelism must be a positive integer, got 0"));
        }
        Ok(Self {
            threads,
            progress: false,
        })
    }

    /// Engine with one worker per available core
    pub fn with_available_parallelism() -> Self {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            threads,
            progress: false,
        }
    }

    /// Show a progress bar on stderr while computing
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Initialize `model` on the alignment and compute its matrix
    pub fn run(
        &self,
        alignment: &Alignment,
        weights: Option<&[f64]>,
        model: &dyn SubstitutionModel,
        rates: RateVariation,
    ) -> Result<DistanceMatrix> {
        let fitted = model.init_model(alignment, weights, rates)?;
        self.compute_matrix(alignment, weights, fitted.as_ref())
    }

    /// Evaluate every unordered pair with an initialized model.
    ///
    /// Each cell is computed once by a single worker and mirrored. The first
    /// failing pair aborts the computation and no matrix is returned.
    pub fn compute_matrix(
        &self,
        alignment: &Alignment,
        weights: Option<&[f64]>,
        model: &dyn FittedModel,
    ) -> Result<DistanceMatrix> {
        validate_weights(weights, alignment.length())?;
        if model.selection().len() != alignment.length() {
            return Err(DistError::alignment(format!(
                "model '{}' was fitted on {} sites but the alignment has {}",
                model.name(),
                model.selection().len(),
                alignment.length()
            )));
        }

        let n = alignment.n_sequences();
        let records = alignment.records();
        let total_comparisons = pairwise_comparisons(n);

        let pb = self.progress_bar(total_comparisons);
        let update_interval = std::cmp::max(1, total_comparisons / 100);
        let progress_counter = AtomicUsize::new(0);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| DistError::config(format!("Failed to build thread pool: {}", e)))?;

        let upper_triangle: Result<Vec<(usize, usize, f64)>> = pool.install(|| {
            (0..n)
                .into_par_iter()
                .flat_map_iter(|i| {
                    let first = &records[i];
                    let pb = &pb;
                    let progress_counter = &progress_counter;
                    (i + 1..n).map(move |j| -> Result<(usize, usize, f64)> {
                        let second = &records[j];
                        let distance = model
                            .distance(&first.sequence, &second.sequence, weights)
                            .map_err(|e| DistError::pair(&first.name, &second.name, e))?;

                        let count = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
                        if count % update_interval == 0 {
                            pb.set_position(count as u64);
                        }

                        Ok((i, j, distance))
                    })
                })
                .collect()
        });

        let upper_triangle = match upper_triangle {
            Ok(cells) => cells,
            Err(e) => {
                pb.abandon();
                return Err(e);
            }
        };
        pb.finish_with_message("Distance matrix computation completed");

        Ok(DistanceMatrix::from_upper_triangle(alignment.names(), upper_triangle))
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

/// Number of distinct unordered pairs among `n` sequences
pub fn pairwise_comparisons(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Compute the distance matrix of an alignment with an initialized model
/// on `parallelism` worker threads
pub fn dist_matrix(
    alignment: &Alignment,
    weights: Option<&[f64]>,
    model: &dyn FittedModel,
    parallelism: usize,
) -> Result<DistanceMatrix> {
    DistanceEngine::new(parallelism)?.compute_matrix(alignment, weights, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sites::{select_sites, SiteSelection};
    use crate::models::{model, ModelRegistry};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_pairwise_comparisons() {
        assert_eq!(pairwise_comparisons(0), 0);
        assert_eq!(pairwise_comparisons(1), 0);
        assert_eq!(pairwise_comparisons(3), 3);
        assert_eq!(pairwise_comparisons(10), 45);
    }

    fn example() -> Alignment {
        Alignment::from_pairs([
            ("seq1", "AAAAAAAAAA"),
            ("seq2", "AAAAAAAAAT"),
            ("seq3", "AAAAAAAATT"),
        ])
        .unwrap()
    }

    fn mixed() -> Alignment {
        Alignment::from_pairs([
            ("a", "ACGTTGCAACGGTACCATGAACGTTGCAAC"),
            ("b", "ACGTTGCAACGGTACCATGAACGTAGCAAC"),
            ("c", "ACGATGCAACGGTTCCATGAACGTTGCTAC"),
            ("d", "GCGTTGCAATGGTACCATGAACCTTGCAAC"),
            ("e", "ACGTTGTAACGGTACCGTGAACGTTGCAAG"),
            ("f", "ACTTTGCAACGGTACCATGCACGTTGCAAC"),
        ])
        .unwrap()
    }

    #[test]
    fn test_pdist_example() {
        let aln = example();
        let fitted = model("pdist", false)
            .unwrap()
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        let m = dist_matrix(&aln, None, fitted.as_ref(), 2).unwrap();

        assert_eq!(m.len(), 3);
        assert_eq!(m.names(), &["seq1", "seq2", "seq3"]);
        assert_abs_diff_eq!(m.get(0, 1).unwrap(), 0.1, epsilon = 1e-9);
        assert_abs_diff_eq!(m.get(0, 2).unwrap(), 0.2, epsilon = 1e-9);
        assert_abs_diff_eq!(m.get(1, 2).unwrap(), 0.1, epsilon = 1e-9);
        for i in 0..3 {
            assert_eq!(m.get(i, i), Some(0.0));
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    #[test]
    fn test_symmetry_and_determinism_across_threads() {
        let aln = mixed();
        for name in ModelRegistry::new().get_model_names() {
            let fitted = model(name, false)
                .unwrap()
                .init_model(&aln, None, RateVariation::Gamma { alpha: 1.5 })
                .unwrap();
            let reference = dist_matrix(&aln, None, fitted.as_ref(), 1).unwrap();
            for i in 0..aln.n_sequences() {
                assert_eq!(reference.get(i, i), Some(0.0));
                for j in 0..aln.n_sequences() {
                    assert_eq!(reference.get(i, j), reference.get(j, i));
                    assert!(reference.get(i, j).unwrap() >= 0.0);
                }
            }
            for threads in 2..=4 {
                let m = dist_matrix(&aln, None, fitted.as_ref(), threads).unwrap();
                for (row, expected) in m.values().iter().zip(reference.values()) {
                    for (d, e) in row.iter().zip(expected) {
                        assert_abs_diff_eq!(*d, *e, epsilon = 1e-12);
                    }
                }
            }
        }
    }

    #[test]
    fn test_gap_columns_removed() {
        let gapped = Alignment::from_pairs([
            ("a", "ACG-TACGTTGCA"),
            ("b", "ACGATACGTAGCA"),
            ("c", "ACGCTACCTTGCA"),
        ])
        .unwrap();
        let deleted = Alignment::from_pairs([
            ("a", "ACGTACGTTGCA"),
            ("b", "ACGTACGTAGCA"),
            ("c", "ACGTACCTTGCA"),
        ])
        .unwrap();
        let engine = DistanceEngine::new(2).unwrap();
        for name in ModelRegistry::new().get_model_names() {
            let m = model(name, true).unwrap();
            let with_gap = engine
                .run(&gapped, None, m.as_ref(), RateVariation::Uniform)
                .unwrap();
            let without = engine
                .run(&deleted, None, m.as_ref(), RateVariation::Uniform)
                .unwrap();
            assert_eq!(with_gap.values(), without.values(), "model {}", name);
        }
    }

    #[test]
    fn test_weights() {
        let aln = example();
        let weights = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 2.0];
        let fitted = model("pdist", false)
            .unwrap()
            .init_model(&aln, Some(weights.as_slice()), RateVariation::Uniform)
            .unwrap();
        let m = dist_matrix(&aln, Some(weights.as_slice()), fitted.as_ref(), 1).unwrap();
        // Total weight 10, last column weighs 2
        assert_abs_diff_eq!(m.get(0, 1).unwrap(), 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get(1, 2).unwrap(), 0.0, epsilon = 1e-12);

        let err = dist_matrix(&aln, Some(&weights[..5]), fitted.as_ref(), 1).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_zero_parallelism() {
        assert!(DistanceEngine::new(0).unwrap_err().is_config());
        let aln = example();
        let fitted = model("jc", false)
            .unwrap()
            .init_model(&aln, None, RateVariation::Uniform)
            .unwrap();
        assert!(dist_matrix(&aln, None, fitted.as_ref(), 0).is_err());
    }

    #[derive(Debug)]
    struct FailingModel {
        selection: SiteSelection,
    }

    impl FittedModel for FailingModel {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn distance(&self, seq1: &[u8], _seq2: &[u8], _weights: Option<&[f64]>) -> Result<f64> {
            if seq1.ends_with(b"TT") {
                Err(DistError::estimation("boom"))
            } else {
                Ok(1.0)
            }
        }

        fn selection(&self) -> &SiteSelection {
            &self.selection
        }
    }

    #[test]
    fn test_failing_pair_aborts() {
        let aln = Alignment::from_pairs([
            ("seq1", "AAAAAAAAAA"),
            ("seq2", "AAAAAAAATT"),
            ("seq3", "AAAAAAAAAA"),
        ])
        .unwrap();
        let failing = FailingModel {
            selection: select_sites(&aln, None, false).unwrap(),
        };
        let err = DistanceEngine::new(3)
            .unwrap()
            .compute_matrix(&aln, None, &failing)
            .unwrap_err();
        match err {
            DistError::Pair { first, second, .. } => {
                assert_eq!(first, "seq2");
                assert_eq!(second, "seq3");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_model_fitted_on_other_alignment() {
        let fitted = model("k2p", false)
            .unwrap()
            .init_model(&mixed(), None, RateVariation::Uniform)
            .unwrap();
        let err = dist_matrix(&example(), None, fitted.as_ref(), 1).unwrap_err();
        assert!(matches!(err, DistError::Alignment { .. }));
    }

    #[test]
    fn test_single_sequence() {
        let aln = Alignment::from_pairs([("only", "ACGT")]).unwrap();
        let engine = DistanceEngine::with_available_parallelism().with_progress(false);
        let m = engine
            .run(&aln, None, model("f81", false).unwrap().as_ref(), RateVariation::Uniform)
            .unwrap();
        assert_eq!(m.values(), &[vec![0.0]]);
    }
}
