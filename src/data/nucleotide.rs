// nucleotide.rs - Symbol classification for aligned nucleotide sequences

/// Gap symbol used in alignments
pub const GAP: u8 = b'-';

/// Number of nucleotide states (A, C, G, T)
pub const N_STATES: usize = 4;

/// State order used by frequency vectors and rate matrices
pub const STATES: [u8; N_STATES] = [b'A', b'C', b'G', b'T'];

pub const A: usize = 0;
pub const C: usize = 1;
pub const G: usize = 2;
pub const T: usize = 3;

/// Check whether a symbol is an alignment gap
#[inline]
pub fn is_gap(symbol: u8) -> bool {
    symbol == GAP
}

/// Index of an unambiguous base in A,C,G,T order; `None` for gaps and
/// ambiguity codes. Expects upper-case input (U is read as T).
#[inline]
pub fn base_index(symbol: u8) -> Option<usize> {
    match symbol {
        b'A' => Some(A),
        b'C' => Some(C),
        b'G' => Some(G),
        b'T' | b'U' => Some(T),
        _ => None,
    }
}

/// Purines are A and G
#[inline]
pub fn is_purine(index: usize) -> bool {
    index == A || index == G
}

/// Kind of change observed between two aligned bases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    Identical,
    /// A <-> G
    PurineTransition,
    /// C <-> T
    PyrimidineTransition,
    Transversion,
}

impl Substitution {
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            Substitution::PurineTransition | Substitution::PyrimidineTransition
        )
    }
}

/// Classify the pair of symbols at one column. Returns `None` unless both
/// are unambiguous bases.
#[inline]
pub fn classify(first: u8, second: u8) -> Option<Substitution> {
    let i = base_index(first)?;
    let j = base_index(second)?;
    Some(if i == j {
        Substitution::Identical
    } else if is_purine(i) && is_purine(j) {
        Substitution::PurineTransition
    } else if !is_purine(i) && !is_purine(j) {
        Substitution::PyrimidineTransition
    } else {
        Substitution::Transversion
    })
}
