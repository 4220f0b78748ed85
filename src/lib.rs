//! Pseudo-arclength numerical continuation
//! ========================================================
//!
//! This crate traces the solution branch of a parametrized system of
//! nonlinear equations `f(x, lambda) = 0` as the load-proportionality
//! factor `lambda` moves, using a local-parametrization pseudo-arclength
//! method able to negotiate limit points (turning points in `lambda`)
//! without the tangent predictor going singular.
//!
//! # Key idea
//!
//! Rather than solving `f(x, lambda) = 0` for a fixed `lambda`, each step
//! augments the system with a control equation that pins one component of
//! the extended state `y = (x, lambda)` to a target value, and lets Newton
//! iteration solve for the rest. Which component is pinned is re-derived
//! from the corrector's own solution after every cycle (`crate::control`),
//! so the driver can switch away from `lambda` and pin a state component
//! instead when the branch folds back on itself.
//!
//! # Module layout
//!
//!  - [`control`] - the control coordinate: selection, resolution from a
//!    user-facing [`control::ControlSpec`], and the dominant-component rule.
//!  - [`jacobian`] - finite-difference Jacobian approximation (forward or
//!    central).
//!  - [`augmented`] - the augmented residual and Jacobian, dense or sparse.
//!  - [`newton`] - the underlying Newton-Raphson corrector.
//!  - [`newtonxt`] - the parametrized corrector, combining the above into a
//!    single cycle.
//!  - [`continuation`] - the driver, step-width rebalancing, progress
//!    reporting and file logging.
//!  - [`errors`] - the error taxonomy.
//!
//! # Example
//! ```
//! use contique_rs::continuation::{ContinuationConfig, ContinuationDriver};
//! use nalgebra::DVector;
//!
//! // f(x, lambda) = x^2 - 2 - lambda
//! fn square2(x: &DVector<f64>, lambda: f64) -> DVector<f64> {
//!     DVector::from_vec(vec![x[0] * x[0] - 2.0 - lambda])
//! }
//!
//! let config = ContinuationConfig { maxsteps: 5, ..Default::default() };
//! let driver = ContinuationDriver::new(config, square2);
//! let y0 = DVector::from_vec(vec![1.4142, 0.0]);
//!
//! for step in driver.run(y0) {
//!     if !step.success {
//!         break;
//!     }
//! }
//! ```

pub mod augmented;
pub mod continuation;
pub mod control;
pub mod errors;
pub mod jacobian;
pub mod newton;
pub mod newtonxt;
