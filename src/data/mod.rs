// mod.rs - Data structures module

pub mod alignment;
pub mod nucleotide;
pub mod weights;

// Re-export main types for convenience
pub use alignment::{Alignment, SequenceRecord};
pub use weights::{load_weights, validate_weights};
