//! Progress reporting (component H).
//!
//! Mirrors `contique.printinfo`: a status-to-message table plus a
//! fixed-width progress line per cycle. The continuation driver never
//! prints directly, it reports through a [`ProgressReporter`] so a caller
//! can swap in a silent reporter, or route the same events into a log file
//! via [`crate::continuation::log::ContinuationLog`].

use crate::control::Control;

/// `contique.printinfo`'s four-way display status, distinct from the
/// corrector's own binary `status` (0 = not converged, 1 = converged):
/// this one also reflects whether the control coordinate changed and
/// whether the change was within the overshoot tolerance.
const STATUS_MESSAGES: [&str; 4] = [
    "not converged",
    "converged",
    "converged, control changed - recycling",
    "converged, control changed within overshoot tolerance - accepted",
];

/// One reported cycle's worth of information.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub step: usize,
    pub cycle: usize,
    pub control_in: Control,
    pub control_out: Control,
    /// The corrector's own binary status (0 or 1).
    pub corrector_status: u8,
    pub residual_norm: f64,
    pub niterations: usize,
    pub overshoot_ok: bool,
}

impl CycleReport {
    /// Derive `contique.printinfo`'s four-way display status from the raw
    /// corrector outcome and the control-coordinate comparison.
    pub fn display_status(&self) -> u8 {
        if self.corrector_status == 0 {
            0
        } else if self.control_in == self.control_out {
            1
        } else if self.overshoot_ok {
            3
        } else {
            2
        }
    }

    pub fn message(&self) -> &'static str {
        STATUS_MESSAGES[self.display_status() as usize]
    }
}

/// Sink for the driver's progress events.
pub trait ProgressReporter {
    fn header(&mut self) {}
    fn cycle(&mut self, _report: &CycleReport) {}
    /// The control coordinate kept changing for `maxcycles` in a row.
    fn control_error(&mut self, _step: usize) {}
    /// The run is terminating on an unrecovered step failure.
    fn final_error(&mut self, _step: usize, _message: &str) {}
}

/// Prints a `contique`-style table to stdout.
#[derive(Debug, Default)]
pub struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn header(&mut self) {
        println!(
            "{:>6} {:>6} {:>10} {:>12} {:>8}  {}",
            "step", "cycle", "control", "residual", "niter", "status"
        );
    }

    fn cycle(&mut self, report: &CycleReport) {
        println!(
            "{:>6} {:>6} {:>10} {:>12.3e} {:>8}  {}",
            report.step,
            report.cycle,
            report.control_out.to_string(),
            report.residual_norm,
            report.niterations,
            report.message()
        );
    }

    fn control_error(&mut self, step: usize) {
        println!("step {}: control component changed in every cycle; reduce stepwidth", step);
    }

    fn final_error(&mut self, step: usize, message: &str) {
        println!("step {}: run terminated: {}", step, message);
    }
}

/// Reports nothing. The default for [`crate::continuation::driver::ContinuationDriver`].
#[derive(Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {}
