//! Property-based tests for invariants that must hold regardless of the
//! particular residual function: the pinned coordinate lands on its target
//! within tolerance, the corrector is deterministic, and rebalancing never
//! pushes `dymax` outside its configured bounds.

use contique_rs::augmented;
use contique_rs::control::{self, Control};
use contique_rs::continuation::rebalance::{RebalanceParams, Rebalancer};
use contique_rs::jacobian::Mode;
use contique_rs::newton::default_solve;
use contique_rs::newtonxt::{newtonxt, FdSettings};
use nalgebra::DVector;
use proptest::prelude::*;

fn square2(x: &DVector<f64>, lambda: f64) -> DVector<f64> {
    DVector::from_vec(vec![x[0] * x[0] - 2.0 - lambda])
}

proptest! {
    #[test]
    fn pinned_coordinate_reaches_its_target_within_tolerance(
        x0 in 1.1f64..2.0,
        lambda0 in -0.5f64..0.5,
        sign in prop_oneof![Just(1i8), Just(-1i8)],
        dymax_val in 0.01f64..0.2,
    ) {
        let y0 = DVector::from_vec(vec![x0, lambda0]);
        let dymax = DVector::from_vec(vec![dymax_val, dymax_val]);
        let control = Control::new(1, sign);
        let tol = 1e-10;

        let result = newtonxt(
            &square2,
            None,
            &y0,
            control,
            &dymax,
            FdSettings::default(),
            40,
            tol,
            &default_solve,
        );

        if result.success {
            let target = lambda0 + sign as f64 * dymax_val;
            prop_assert!((result.y[1] - target).abs() < 1e-6);
            prop_assert!(result.residual.norm() < tol * 10.0);
        }
    }

    #[test]
    fn the_corrector_is_deterministic(
        x0 in 1.1f64..2.0,
        lambda0 in -0.5f64..0.5,
    ) {
        let y0 = DVector::from_vec(vec![x0, lambda0]);
        let dymax = DVector::from_vec(vec![0.1, 0.1]);
        let control = Control::new(1, 1);

        let a = newtonxt(&square2, None, &y0, control, &dymax, FdSettings::default(), 20, 1e-10, &default_solve);
        let b = newtonxt(&square2, None, &y0, control, &dymax, FdSettings::default(), 20, 1e-10, &default_solve);

        prop_assert_eq!(a.success, b.success);
        prop_assert_eq!(a.niterations, b.niterations);
        prop_assert_eq!(a.y, b.y);
    }

    #[test]
    fn rebalanced_stepwidth_never_leaves_its_configured_bounds(
        x0 in 0.01f64..5.0,
        xn in 0.001f64..50.0,
        success in prop::bool::ANY,
        niterations in 0usize..20,
    ) {
        let mut rebalancer = Rebalancer::new();
        let params = RebalanceParams::default();
        let x0v = DVector::from_vec(vec![x0]);
        let xnv = DVector::from_vec(vec![xn]);

        let (y, _) = rebalancer.adjust(&x0v, &xnv, success, niterations, &params);

        prop_assert!(y[0] >= params.low * x0 - 1e-9);
        prop_assert!(y[0] <= params.high * x0 + 1e-9);
    }
}

#[test]
fn the_augmented_residual_vanishes_at_an_accepted_solution() {
    let y = DVector::from_vec(vec![2.0f64.sqrt(), 0.0]);
    let needle = control::one_hot(1, 2);
    let y_target = y.clone();
    let residual = augmented::residual(&y, &needle, &y_target, &square2);
    assert!(residual.norm() < 1e-8);

    // A sanity check that the Jacobian fallback produces the right shape.
    let jac = augmented::jacobian(&y, &needle, &square2, None, Mode::Central, None);
    assert!(!jac.is_sparse());
}
