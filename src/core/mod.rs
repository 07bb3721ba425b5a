// mod.rs - Core logic module

pub mod counts;
pub mod distance;
pub mod sites;

// Re-export main types for convenience
pub use counts::{
    count_diffs, count_diffs_with_gaps, count_diffs_with_internal_gaps, count_mutations,
    MutationCounts,
};
pub use distance::{dist_matrix, pairwise_comparisons, DistanceEngine, DistanceMatrix};
pub use sites::{estimate_frequencies, select_sites, SiteSelection};
