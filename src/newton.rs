//! Newton corrector for the augmented system.
//!
//! A damped-free Newton-Raphson iteration on a general residual/Jacobian
//! pair, specialized here to the augmented system built by
//! [`crate::augmented`]. Mirrors `contique.newton.newtonrhapson` /
//! `NewtonResult`.

use nalgebra::DVector;

use crate::augmented::AugmentedJacobian;
use crate::errors::CorrectorFailure;

/// Result of a single corrector attempt (spec.md §3's "Step result", minus
/// the `dys`/`control` fields which [`crate::newtonxt`] adds once the
/// corrector has converged or exhausted its budget).
#[derive(Debug, Clone)]
pub struct CorrectorResult {
    pub success: bool,
    pub status: u8,
    pub message: String,
    pub niterations: usize,
    pub x: DVector<f64>,
    pub fun: DVector<f64>,
}

/// `solve(A, b) -> x` such that `A x = b`. Returns `None` on breakdown
/// (singular matrix or any other failure to produce a step).
pub type LinearSolve<'a> = dyn Fn(&AugmentedJacobian, &DVector<f64>) -> Option<DVector<f64>> + 'a;

/// Dense LU solve, used when no solver collaborator is supplied and the
/// Jacobian is dense. Sparse Jacobians are densified first: a genuine
/// sparse factorization is an external collaborator per spec.md §1, out of
/// scope for this crate's core.
pub fn default_solve(jac: &AugmentedJacobian, b: &DVector<f64>) -> Option<DVector<f64>> {
    let dense = match jac {
        AugmentedJacobian::Dense(m) => m.clone(),
        AugmentedJacobian::Sparse(m) => {
            let mut dense = nalgebra::DMatrix::zeros(m.nrows(), m.ncols());
            for (row, col, value) in m.triplet_iter() {
                dense[(row, col)] = *value;
            }
            dense
        }
    };
    dense.lu().solve(b)
}

/// Newton-Raphson iteration: `solve(Dg(yk), -g(yk))`, `y_{k+1} = y_k + delta`,
/// until `||g|| < tol` or `maxiter` is exhausted.
///
/// `maxiter = 0` returns the initial state with a single residual (and
/// Jacobian) evaluation, without iterating — used by the driver to
/// materialize the first emitted result. `maxiter = 1` performs exactly one
/// tangent step (a predictor).
///
/// If the linear solve breaks down, `x` is set to `NaN` and convergence is
/// reported as failed; the caller (the continuation driver) treats this as
/// a failed cycle rather than aborting the run.
pub fn newton_raphson<G, J>(
    residual: G,
    jacobian: J,
    y0: &DVector<f64>,
    solve: &LinearSolve,
    maxiter: usize,
    tol: f64,
) -> CorrectorResult
where
    G: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> AugmentedJacobian,
{
    let mut x = y0.clone();
    let mut fun = residual(&x);

    let mut result = CorrectorResult {
        success: false,
        status: 0,
        message: String::from("not started"),
        niterations: 0,
        x: x.clone(),
        fun: fun.clone(),
    };

    for iter in 1..=maxiter {
        result.niterations = iter;

        let dg = jacobian(&x);
        match solve(&dg, &(-&fun)) {
            Some(delta) => x += delta,
            None => {
                x.apply(|v| *v = f64::NAN);
                result.x = x;
                result.fun = fun;
                result.success = false;
                result.status = 0;
                result.message = CorrectorFailure::SingularJacobian.to_string();
                return result;
            }
        }

        fun = residual(&x);

        if fun.norm() < tol {
            result.success = true;
            result.status = 1;
            result.message = if iter == 1 {
                String::from("Solution converged in 1 iteration")
            } else {
                format!("Solution converged in {} iterations", iter)
            };
            result.x = x;
            result.fun = fun;
            return result;
        }
    }

    result.x = x;
    result.fun = fun;
    if maxiter == 0 {
        result.message = String::from("initial evaluation only (maxiter = 0)");
    } else if maxiter == 1 {
        result.message = String::from(
            "calculated linear (predictor) solution because of input parameter maxiter = 1 (not converged)",
        );
    } else {
        result.message = CorrectorFailure::NonConvergence { niterations: result.niterations }.to_string();
    }
    result
}
