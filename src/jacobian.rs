//! Finite-difference Jacobian approximation.
//!
//! Given a residual `f(x, lambda)`, these helpers approximate its Jacobian
//! with respect to either argument by forward or central differences. This
//! is the pluggable numerical helper named in spec.md's out-of-scope list
//! for user-supplied functions in general, but the two instantiations here
//! (w.r.t. the vector argument `x` and w.r.t. the scalar `lambda`) are what
//! the augmented system (`crate::augmented`) falls back to when the user
//! does not supply an analytic Jacobian pair.
//!
//! Perturbation is always applied to a cloned copy of the input; the
//! caller's vectors are never mutated.

use nalgebra::{DMatrix, DVector};

/// Finite-difference scheme.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Two-point forward difference, `O(h)` accurate.
    Forward,
    /// Three-point central difference, `O(h^2)` accurate.
    Central,
}

impl Mode {
    /// The divisor used in the default step-size formula `eps^(1/order)`,
    /// and the number of function evaluations per perturbed component.
    fn order(self) -> f64 {
        match self {
            Mode::Forward => 2.0,
            Mode::Central => 3.0,
        }
    }
}

/// Default perturbation step, `eps^(1/mode.order())`, unless the caller
/// overrides it.
pub fn step_size(h: Option<f64>, mode: Mode) -> f64 {
    h.unwrap_or_else(|| f64::EPSILON.powf(1.0 / mode.order()))
}

/// Approximate `df/dx` at `(x, lpf)` by perturbing each component of `x` in
/// turn. The result has shape `f(x).len() x x.len()`.
pub fn jacobian_wrt_x<F>(f: &F, x: &DVector<f64>, lpf: f64, mode: Mode, h: Option<f64>) -> DMatrix<f64>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64>,
{
    let step = step_size(h, mode);
    let f0 = f(x, lpf);
    let mut jac = DMatrix::zeros(f0.len(), x.len());

    for j in 0..x.len() {
        let mut forward = x.clone();
        forward[j] += step;
        let f_forward = f(&forward, lpf);

        let column = match mode {
            Mode::Forward => (f_forward - &f0) / step,
            Mode::Central => {
                let mut backward = x.clone();
                backward[j] -= step;
                let f_backward = f(&backward, lpf);
                (f_forward - f_backward) / (2.0 * step)
            }
        };
        jac.set_column(j, &column);
    }

    jac
}

/// Approximate `df/dlambda` at `(x, lpf)` by perturbing the scalar `lambda`.
/// The result has shape `f(x).len()`.
pub fn jacobian_wrt_lpf<F>(f: &F, x: &DVector<f64>, lpf: f64, mode: Mode, h: Option<f64>) -> DVector<f64>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64>,
{
    let step = step_size(h, mode);
    let f0 = f(x, lpf);

    match mode {
        Mode::Forward => {
            let f_forward = f(x, lpf + step);
            (f_forward - f0) / step
        }
        Mode::Central => {
            let f_forward = f(x, lpf + step);
            let f_backward = f(x, lpf - step);
            (f_forward - f_backward) / (2.0 * step)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn square(x: &DVector<f64>, lpf: f64) -> DVector<f64> {
        DVector::from_vec(vec![x[0] * x[0] - lpf])
    }

    #[test]
    fn forward_difference_matches_analytic_derivative() {
        let x = DVector::from_vec(vec![3.0]);
        let jac = jacobian_wrt_x(&square, &x, 0.0, Mode::Forward, None);
        assert!(approx_eq!(f64, jac[(0, 0)], 6.0, epsilon = 1e-4));
    }

    #[test]
    fn central_difference_is_more_accurate_than_forward() {
        let x = DVector::from_vec(vec![3.0]);
        let h = 1e-3;
        let forward = jacobian_wrt_x(&square, &x, 0.0, Mode::Forward, Some(h));
        let central = jacobian_wrt_x(&square, &x, 0.0, Mode::Central, Some(h));
        assert!((central[(0, 0)] - 6.0).abs() < (forward[(0, 0)] - 6.0).abs());
    }

    #[test]
    fn jacobian_wrt_lpf_matches_analytic_derivative() {
        let x = DVector::from_vec(vec![3.0]);
        let dfdl = jacobian_wrt_lpf(&square, &x, 0.0, Mode::Central, None);
        assert!(approx_eq!(f64, dfdl[0], -1.0, epsilon = 1e-6));
    }

    #[test]
    fn default_step_size_scales_with_order() {
        assert!(step_size(None, Mode::Forward) > step_size(None, Mode::Central));
    }
}
