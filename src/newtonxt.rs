//! Parametrized Newton corrector (`newtonxt`).
//!
//! Builds the augmented system for a given control coordinate, runs the
//! corrector, then derives the normalized increment and a new candidate
//! control coordinate from it. Mirrors `contique.newtonxt.newtonxt`.

use nalgebra::DVector;

use crate::augmented::{self, AugmentedJacobian, JacobianPair};
use crate::control::{self, Control};
use crate::jacobian::Mode;
use crate::newton::{self, LinearSolve};

/// The result of one parametrized-Newton attempt: a [`crate::newton::CorrectorResult`]
/// extended with the normalized increment `dys` and the control coordinate
/// the corrector's own solution points to next (spec.md §3's "Step result").
#[derive(Debug, Clone)]
pub struct StepResult {
    pub success: bool,
    pub status: u8,
    pub message: String,
    pub niterations: usize,
    pub y: DVector<f64>,
    pub residual: DVector<f64>,
    pub jac: AugmentedJacobian,
    pub dys: DVector<f64>,
    pub control: Control,
}

/// Finite-difference settings threaded through to [`crate::jacobian`] when
/// no analytic Jacobian pair is supplied.
#[derive(Debug, Copy, Clone)]
pub struct FdSettings {
    pub mode: Mode,
    pub eps: Option<f64>,
}

impl Default for FdSettings {
    fn default() -> Self {
        FdSettings { mode: Mode::Central, eps: None }
    }
}

/// Run the corrector on the augmented system pinning `control` to
/// `y0[control.index] + control.sign * dymax[control.index]`, then derive
/// the normalized increment and the next control coordinate.
#[allow(clippy::too_many_arguments)]
pub fn newtonxt<F>(
    f: &F,
    analytic_jac: Option<&JacobianPair>,
    y0: &DVector<f64>,
    control: Control,
    dymax: &DVector<f64>,
    fd: FdSettings,
    maxiter: usize,
    tol: f64,
    solve: &LinearSolve,
) -> StepResult
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64>,
{
    let needle = control::one_hot(control.index, y0.len());

    let mut y_target = y0.clone();
    y_target[control.index] = y0[control.index] + control.sign as f64 * dymax[control.index];

    let residual_fn = |y: &DVector<f64>| augmented::residual(y, &needle, &y_target, f);
    let jacobian_fn = |y: &DVector<f64>| augmented::jacobian(y, &needle, f, analytic_jac, fd.mode, fd.eps);

    let corrected = newton::newton_raphson(residual_fn, jacobian_fn, y0, solve, maxiter, tol);

    let dys = (&corrected.x - y0).component_div(dymax);

    let new_control = if dys.iter().any(|v| v.is_nan()) {
        control
    } else {
        control::dominant_component(&dys)
    };

    let jac = jacobian_fn(&corrected.x);

    StepResult {
        success: corrected.success,
        status: corrected.status,
        message: corrected.message,
        niterations: corrected.niterations,
        y: corrected.x,
        residual: corrected.fun,
        jac,
        dys,
        control: new_control,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newton::default_solve;

    fn square2(x: &DVector<f64>, lpf: f64) -> DVector<f64> {
        DVector::from_vec(vec![x[0] * x[0] - 2.0 - lpf])
    }

    #[test]
    fn predictor_step_does_not_converge_but_reports_a_new_control() {
        let y0 = DVector::from_vec(vec![1.0, 0.0]);
        let dymax = DVector::from_vec(vec![0.1, 0.1]);
        let control = Control::new(1, 1);
        let result = newtonxt(&square2, None, &y0, control, &dymax, FdSettings::default(), 1, 1e-10, &default_solve);
        assert_eq!(result.niterations, 1);
        assert!(!result.success);
    }

    #[test]
    fn full_cycle_converges_and_pins_the_control_coordinate() {
        let y0 = DVector::from_vec(vec![1.4, 0.0]);
        let dymax = DVector::from_vec(vec![0.1, 0.1]);
        let control = Control::new(1, 1);
        let result = newtonxt(&square2, None, &y0, control, &dymax, FdSettings::default(), 20, 1e-10, &default_solve);
        assert!(result.success);
        assert!((result.y[1] - 0.1).abs() < 1e-8);
    }
}
