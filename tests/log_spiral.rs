//! Traces a logarithmic spiral `x = r*cos(lambda)`, `y = r*sin(lambda)` with
//! `r = a*exp(k*lambda)`, control pinned to the load-proportionality factor.

mod common;

use contique_rs::continuation::{ContinuationConfig, ContinuationDriver};
use contique_rs::control::ControlSpec;
use nalgebra::DVector;

fn fun(x: &DVector<f64>, lambda: f64) -> DVector<f64> {
    let a = 1.0;
    let k = 0.1;
    let r = a * (k * lambda).exp();
    DVector::from_vec(vec![-x[0] + r * lambda.cos(), -x[1] + r * lambda.sin()])
}

#[test]
fn the_trace_visits_all_four_quadrants() {
    let config = ContinuationConfig {
        control0: ControlSpec::lpf(1),
        dxmax: 0.2,
        dlpfmax: 0.2,
        maxsteps: 500,
        maxcycles: 4,
        maxiter: 20,
        tol: 1e-12,
        overshoot: 1.05,
        ..Default::default()
    };

    let driver = ContinuationDriver::new(config, fun);
    let y0 = DVector::from_vec(vec![1.0, 0.0, 0.0]);
    let steps = common::collect_successful(driver.run(y0));

    assert!(steps.len() > 5);

    for step in &steps {
        let lambda = step.y[2];
        let radius = (step.y[0] * step.y[0] + step.y[1] * step.y[1]).sqrt();
        let expected = (0.1 * lambda).exp();
        assert!((radius - expected).abs() < 1e-6, "spiral radius drifted from the analytic curve");
    }

    let mut quadrants = [false; 4];
    for step in &steps {
        let (px, py) = (step.y[0], step.y[1]);
        let q = match (px >= 0.0, py >= 0.0) {
            (true, true) => 0,
            (false, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        };
        quadrants[q] = true;
    }
    assert!(quadrants.iter().all(|&visited| visited), "trace did not visit all four quadrants: {:?}", quadrants);
}
