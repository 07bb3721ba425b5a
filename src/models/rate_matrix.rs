// rate_matrix.rs - Tamura-Nei (1993) rate matrix and its eigen-decomposition

use nalgebra::{Matrix4, SymmetricEigen, Vector4};
use crate::data::nucleotide::N_STATES;
use crate::error::{DistError, Result};

/// Normalized TN93 rate matrix over A,C,G,T.
///
/// `kappa1` scales A<->G transitions, `kappa2` scales C<->T transitions.
/// The matrix is scaled so that the expected substitution rate
/// `-sum(pi_i * Q_ii)` is 1.
///
/// Q is reversible, so `B = D Q D^-1` with `D = diag(sqrt(pi))` is symmetric
/// and has real eigenvalues. With `B = U diag(lambda) U^T` the right
/// eigenvectors of Q are `R = D^-1 U` and the left ones are `L = R^-1`.
#[derive(Debug, Clone)]
pub struct Tn93RateMatrix {
    kappa1: f64,
    kappa2: f64,
    pi: [f64; 4],
    q: Matrix4<f64>,
    eigenvalues: Vector4<f64>,
    left: Matrix4<f64>,
    right: Matrix4<f64>,
}

impl Tn93RateMatrix {
    pub fn new(kappa1: f64, kappa2: f64, pi: [f64; 4]) -> Result<Self> {
        for (name, kappa) in [("kappa1", kappa1), ("kappa2", kappa2)] {
            if !kappa.is_finite() || kappa < 0.0 {
                return Err(DistError::config(format!(
                    "{} must be a non-negative real, got {}",
                    name, kappa
                )));
            }
        }
        if pi.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(DistError::degenerate(format!(
                "rate matrix needs strictly positive base frequencies, got {:?}",
                pi
            )));
        }

        let [pa, pc, pg, pt] = pi;
        #[rustfmt::skip]
        let mut q = Matrix4::new(
            -(pc + kappa1 * pg + pt), pc, kappa1 * pg, pt,
            pa, -(pa + pg + kappa2 * pt), pg, kappa2 * pt,
            kappa1 * pa, pc, -(kappa1 * pa + pc + pt), pt,
            pa, kappa2 * pc, pg, -(pa + kappa2 * pc + pg),
        );

        let norm: f64 = -(0..N_STATES).map(|i| pi[i] * q[(i, i)]).sum::<f64>();
        if !norm.is_finite() || norm <= 0.0 {
            return Err(DistError::degenerate(format!(
                "rate matrix has no substitutions to normalize (kappa1={}, kappa2={})",
                kappa1, kappa2
            )));
        }
        q /= norm;

        let sqrt_pi = Vector4::from_iterator(pi.iter().map(|f| f.sqrt()));
        let symmetric = Matrix4::from_fn(|i, j| q[(i, j)] * sqrt_pi[i] / sqrt_pi[j]);
        // Remove rounding asymmetry before the symmetric solver
        let symmetric = (symmetric + symmetric.transpose()) * 0.5;
        let eigen = SymmetricEigen::new(symmetric);

        let right = Matrix4::from_fn(|i, j| eigen.eigenvectors[(i, j)] / sqrt_pi[i]);
        let left = right.try_inverse().ok_or_else(|| {
            DistError::degenerate("right eigenvector matrix is singular")
        })?;

        if eigen.eigenvalues.iter().any(|l| !l.is_finite()) {
            return Err(DistError::degenerate("eigenvalues are not finite"));
        }

        Ok(Self {
            kappa1,
            kappa2,
            pi,
            q,
            eigenvalues: eigen.eigenvalues,
            left,
            right,
        })
    }

    pub fn kappas(&self) -> (f64, f64) {
        (self.kappa1, self.kappa2)
    }

    pub fn frequencies(&self) -> [f64; 4] {
        self.pi
    }

    /// The normalized rate matrix
    pub fn q(&self) -> &Matrix4<f64> {
        &self.q
    }

    pub fn eigenvalues(&self) -> &Vector4<f64> {
        &self.eigenvalues
    }

    /// Left eigenvectors as rows (`R^-1`)
    pub fn left_eigenvectors(&self) -> &Matrix4<f64> {
        &self.left
    }

    /// Right eigenvectors as columns
    pub fn right_eigenvectors(&self) -> &Matrix4<f64> {
        &self.right
    }

    /// Eigenvalues with left and right eigenvector matrices
    pub fn eigens(&self) -> (&Vector4<f64>, &Matrix4<f64>, &Matrix4<f64>) {
        (&self.eigenvalues, &self.left, &self.right)
    }

    /// Transition probabilities after branch length `t`: `R diag(exp(lambda t)) L`
    pub fn transition_matrix(&self, t: f64) -> Matrix4<f64> {
        let decay = Matrix4::from_diagonal(&self.eigenvalues.map(|l| (l * t).exp()));
        self.right * decay * self.left
    }

    /// Probability of state `j` after branch length `t` starting from `i`.
    /// Returns `None` for a state index outside A,C,G,T.
    pub fn pij(&self, i: usize, j: usize, t: f64) -> Option<f64> {
        if i >= N_STATES || j >= N_STATES {
            return None;
        }
        Some(self.transition_matrix(t)[(i, j)])
    }

    /// No closed-form transition probability is used, callers go through
    /// the eigen-decomposition
    pub fn analytical(&self) -> bool {
        false
    }

    pub fn n_states(&self) -> usize {
        N_STATES
    }
}
