//! Continuation configuration.
//!
//! Mirrors `solver::parameters::SolverParameters` in the teacher crate: a
//! plain data struct with a `Display` impl that renders a boxed ASCII
//! parameter table, plus a set of named defaults matching
//! `contique.numcont.solve`'s keyword defaults.

use std::fmt;

use crate::control::ControlSpec;
use crate::jacobian::Mode;

/// Every tunable of the continuation driver (spec.md §4.F's configuration
/// table).
#[derive(Debug, Clone, Copy)]
pub struct ContinuationConfig {
    /// Initial per-coordinate cap for the state unknowns.
    pub dxmax: f64,
    /// Initial cap for the load-proportionality factor.
    pub dlpfmax: f64,
    /// Initial control coordinate; a negative index counts from the end of
    /// `y` (so `ControlSpec::lpf(1)`, i.e. index `-1`, is the default).
    pub control0: ControlSpec,
    /// Finite-difference scheme used when no analytic Jacobian is supplied.
    pub jacmode: Mode,
    /// Finite-difference step override; `None` uses `eps^(1/order)`.
    pub jaceps: Option<f64>,
    /// Outer step budget.
    pub maxsteps: usize,
    /// Per-step control-switch budget. `0` is honored rather than rejected:
    /// the cycle loop never runs and the step reports the predictor's own
    /// (`maxiter = 1`) attempt, unvalidated and most likely not converged.
    pub maxcycles: usize,
    /// Newton iterations per cycle.
    pub maxiter: usize,
    /// Residual 2-norm tolerance.
    pub tol: f64,
    /// Overshoot tolerance: a cycle is accepted despite a control change if
    /// `max|dys| <= overshoot`.
    pub overshoot: f64,
    /// Whether to rebalance `dymax` after each step.
    pub rebalance: bool,
    pub increase: f64,
    pub decrease: f64,
    pub high: f64,
    pub low: f64,
    pub minlastfailed: usize,
}

impl Default for ContinuationConfig {
    fn default() -> Self {
        ContinuationConfig {
            dxmax: 0.05,
            dlpfmax: 0.05,
            control0: ControlSpec::lpf(1),
            jacmode: Mode::Central,
            jaceps: None,
            maxsteps: 50,
            maxcycles: 4,
            maxiter: 8,
            tol: 1e-6,
            overshoot: 1.0,
            rebalance: false,
            increase: 0.5,
            decrease: 2.0,
            high: 10.0,
            low: 1e-6,
            minlastfailed: 3,
        }
    }
}

impl fmt::Display for ContinuationConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut content = String::from("Continuation parameters\n");
        content.push_str("========================\n\n");
        let separation_line =
            "+-----------------+-----------------+-----------------+--------------------+\n";
        let header =
            "|  Max steps      |  Max cycles     |  Max iteration  |    Tolerance       |\n";

        content.push_str(separation_line);
        content.push_str(header);
        content.push_str(separation_line);
        content.push_str(&format!("| {:width$}", self.maxsteps, width = 16));
        content.push_str(&format!("| {:width$}", self.maxcycles, width = 16));
        content.push_str(&format!("| {:width$}", self.maxiter, width = 16));
        content.push_str(&format!("| {:width$}|\n", self.tol, width = 19));
        content.push_str(separation_line);
        content.push('\n');

        write!(f, "{}", content)
    }
}
