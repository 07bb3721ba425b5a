// lib.rs - ntdist library root

//! # ntdist - Pairwise evolutionary distances between aligned DNA sequences
//!
//! This library computes symmetric distance matrices for a nucleotide
//! multiple alignment under a selectable substitution model, evaluating
//! sequence pairs in parallel.
//!
//! ## Features
//!
//! - **Six models**: pdist, Jukes-Cantor, Kimura 2P, Felsenstein 81/84, Tamura-Nei 93
//! - **Gamma correction**: rate heterogeneity across sites with a shape parameter
//! - **Site handling**: optional per-site weights and gap column removal
//! - **Parallel engine**: rayon worker pool sized by the caller
//! - **Multiple formats**: plain distance layout, TSV, CSV, PHYLIP
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use ntdist::prelude::*;
//!
//! let alignment = Alignment::from_fasta(std::path::Path::new("alignment.fasta"))?;
//! let fitted = model("f84", true)?.init_model(&alignment, None, RateVariation::Uniform)?;
//! let matrix = dist_matrix(&alignment, None, fitted.as_ref(), 4)?;
//!
//! let mut out = std::io::stdout();
//! write_dist(&mut out, &matrix)?;
//! # Ok::<(), ntdist::DistError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{dist_matrix, DistanceEngine, DistanceMatrix};
    pub use crate::data::{Alignment, SequenceRecord};
    pub use crate::error::{DistError, Result};
    pub use crate::models::{model, FittedModel, ModelOptions, ModelRegistry, SubstitutionModel};
    pub use crate::models::{GapCountMode, RateVariation, Tn93RateMatrix, NT_DIST_MAX};
    pub use crate::output::{write_dist, write_matrix, OutputFormat};
}

// Re-export main types at the root level for convenience
pub use crate::cli::{Args, ValidationResult};
pub use crate::core::{dist_matrix, DistanceEngine, DistanceMatrix};
pub use crate::data::Alignment;
pub use crate::error::{DistError, Result};
pub use crate::models::{model, FittedModel, ModelRegistry, RateVariation, SubstitutionModel};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "ntdist v{} - Evolutionary distance matrices for DNA alignments",
        VERSION
    )
}
