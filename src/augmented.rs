//! Augmented residual and Jacobian assembly.
//!
//! Adjoins a scalar control equation to the user's residual `f(x, lambda)`,
//! pinning one component of the extended state `y = (x, lambda)` to a
//! target value. This is the `funxt`/`jacxt` pair of spec.md §4.C.
//!
//! The dense/sparse branch is handled at a single choke point
//! (`assemble_block`), per spec.md §9's design note, rather than threading
//! sparsity through every caller.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::jacobian::{self, Mode};

/// `df/dx`, either as a dense matrix or a compressed-row sparse matrix.
pub enum JacobianBlock {
    Dense(DMatrix<f64>),
    Sparse(CsrMatrix<f64>),
}

/// The assembled `(n+1) x (n+1)` augmented Jacobian.
pub enum AugmentedJacobian {
    Dense(DMatrix<f64>),
    Sparse(CsrMatrix<f64>),
}

impl AugmentedJacobian {
    pub fn is_sparse(&self) -> bool {
        matches!(self, AugmentedJacobian::Sparse(_))
    }
}

/// Analytic Jacobian pair supplied by the user: `df/dx` (dense or sparse)
/// and `df/dlambda` (a length-`n` vector).
pub type JacobianPair<'a> = (
    Box<dyn Fn(&DVector<f64>, f64) -> JacobianBlock + 'a>,
    Box<dyn Fn(&DVector<f64>, f64) -> DVector<f64> + 'a>,
);

/// Split the extended state `y = (x, lambda)` into its parts.
pub fn split(y: &DVector<f64>) -> (DVector<f64>, f64) {
    let n = y.len() - 1;
    (DVector::from_column_slice(&y.as_slice()[..n]), y[n])
}

/// `g(y; n_hat, y*) = [f(x, lambda); n_hat . (y - y*)]`.
pub fn residual<F>(y: &DVector<f64>, needle: &DVector<f64>, y_target: &DVector<f64>, f: &F) -> DVector<f64>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64>,
{
    let (x, lpf) = split(y);
    let fx = f(&x, lpf);

    let control_eq = needle.dot(&(y - y_target));

    let mut g = DVector::zeros(fx.len() + 1);
    g.rows_mut(0, fx.len()).copy_from(&fx);
    g[fx.len()] = control_eq;
    g
}

/// `Dg(y) = [ df/dx  df/dlambda ; n_hat^T ]`.
///
/// Falls back to central/forward finite differences (`crate::jacobian`)
/// when `analytic` is `None`.
pub fn jacobian<F>(
    y: &DVector<f64>,
    needle: &DVector<f64>,
    f: &F,
    analytic: Option<&JacobianPair>,
    mode: Mode,
    jaceps: Option<f64>,
) -> AugmentedJacobian
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64>,
{
    let (x, lpf) = split(y);

    let (dfdx, dfdl) = match analytic {
        Some((jac_x, jac_l)) => (jac_x(&x, lpf), jac_l(&x, lpf)),
        None => (
            JacobianBlock::Dense(jacobian::jacobian_wrt_x(f, &x, lpf, mode, jaceps)),
            jacobian::jacobian_wrt_lpf(f, &x, lpf, mode, jaceps),
        ),
    };

    assemble_block(dfdx, &dfdl, needle)
}

/// Stack `[df/dx | df/dlambda]` over `[n_hat^T]`, branching on sparsity
/// exactly once.
fn assemble_block(dfdx: JacobianBlock, dfdl: &DVector<f64>, needle: &DVector<f64>) -> AugmentedJacobian {
    match dfdx {
        JacobianBlock::Dense(dfdx) => {
            let n = dfdx.nrows();
            let mut dg = DMatrix::zeros(n + 1, n + 1);
            dg.view_mut((0, 0), (n, n)).copy_from(&dfdx);
            dg.view_mut((0, n), (n, 1)).copy_from(dfdl);
            dg.set_row(n, &needle.transpose());
            AugmentedJacobian::Dense(dg)
        }
        JacobianBlock::Sparse(dfdx) => {
            let n = dfdx.nrows();
            let mut coo = CooMatrix::new(n + 1, n + 1);
            for (row, col, value) in dfdx.triplet_iter() {
                coo.push(row, col, *value);
            }
            for row in 0..n {
                if dfdl[row] != 0.0 {
                    coo.push(row, n, dfdl[row]);
                }
            }
            for col in 0..(n + 1) {
                if needle[col] != 0.0 {
                    coo.push(n, col, needle[col]);
                }
            }
            AugmentedJacobian::Sparse(CsrMatrix::from(&coo))
        }
    }
}
