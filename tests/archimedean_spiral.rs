//! Traces an Archimedean spiral `x = r*cos(lambda)`, `y = r*sin(lambda)`
//! with `r = a*lambda`, linear in the continuation parameter rather than
//! exponential (contrast with `log_spiral.rs`).

mod common;

use contique_rs::continuation::{ContinuationConfig, ContinuationDriver};
use nalgebra::DVector;

fn fun(x: &DVector<f64>, lambda: f64) -> DVector<f64> {
    let a = 1.0;
    let r = a * lambda;
    DVector::from_vec(vec![-x[0] + r * lambda.cos(), -x[1] + r * lambda.sin()])
}

#[test]
fn the_radius_grows_linearly_with_the_continuation_parameter() {
    let config = ContinuationConfig {
        dxmax: 0.2,
        dlpfmax: 0.2,
        maxsteps: 60,
        maxcycles: 4,
        maxiter: 8,
        tol: 1e-10,
        overshoot: 1.05,
        ..Default::default()
    };

    let driver = ContinuationDriver::new(config, fun);
    let y0 = DVector::from_vec(vec![0.0, 0.0, 0.0]);
    let steps = common::collect_successful(driver.run(y0));

    assert!(steps.len() > 5);
    for step in &steps {
        let lambda = step.y[2];
        let radius = (step.y[0] * step.y[0] + step.y[1] * step.y[1]).sqrt();
        assert!((radius - lambda.abs()).abs() < 1e-6, "spiral radius drifted from the analytic curve");
    }
}
