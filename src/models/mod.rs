// mod.rs - Substitution models module root

pub mod f81;
pub mod f84;
pub mod jc;
pub mod k2p;
pub mod pdist;
pub mod rate_matrix;
pub mod registry;
pub mod tn93;
pub mod traits;

// Re-export main types for convenience
pub use f81::{F81Model, FittedF81};
pub use f84::{F84Model, FittedF84};
pub use jc::{jc_distance, FittedJc, JcModel};
pub use k2p::{k2p_distance, FittedK2p, K2pModel};
pub use pdist::{FittedPDist, PDistModel};
pub use rate_matrix::Tn93RateMatrix;
pub use registry::{model, ModelRegistry};
pub use tn93::{FittedTn93, Tn93Model};
pub use traits::{
    FittedModel, GapCountMode, ModelOptions, RateVariation, SubstitutionModel, NT_DIST_MAX,
};
