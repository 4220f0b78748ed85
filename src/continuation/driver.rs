//! The continuation driver (component F).
//!
//! Drives [`crate::newtonxt::newtonxt`] step after step: a predictor cycle
//! at `maxiter = 1`, then a corrector cycle loop that re-pins the control
//! coordinate when it drifts, accepting a cycle once the control is stable
//! or the drift is within the overshoot tolerance. Mirrors
//! `contique.numcont.solve`'s generator, with one deliberate difference
//! recorded in DESIGN.md: an unrecoverable terminal failure is yielded as a
//! `StepResult` with `success = false` rather than silently ending the
//! iterator.

use nalgebra::DVector;

use crate::augmented::JacobianPair;
use crate::control::{Control, ControlSpec};
use crate::errors::CallbackError;
use crate::newton::{self, LinearSolve};
use crate::newtonxt::{self, FdSettings, StepResult};

use super::config::ContinuationConfig;
use super::log::ContinuationLog;
use super::rebalance::{RebalanceParams, Rebalancer};
use super::report::{CycleReport, NullReporter, ProgressReporter};

type ObserverCallback<'a> = dyn FnMut(usize, &StepResult) -> Result<(), Box<dyn std::error::Error>> + 'a;

/// Builds a [`ContinuationRun`] iterator over a user residual `f(x, lambda)`.
pub struct ContinuationDriver<'a, F>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a,
{
    config: ContinuationConfig,
    f: F,
    jac: Option<JacobianPair<'a>>,
    solve: Box<LinearSolve<'a>>,
    reporter: Box<dyn ProgressReporter + 'a>,
    callback: Option<Box<ObserverCallback<'a>>>,
    log: Option<ContinuationLog>,
}

impl<'a, F> ContinuationDriver<'a, F>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a,
{
    pub fn new(config: ContinuationConfig, f: F) -> Self {
        ContinuationDriver {
            config,
            f,
            jac: None,
            solve: Box::new(newton::default_solve),
            reporter: Box::new(NullReporter),
            callback: None,
            log: None,
        }
    }

    pub fn with_jacobian(mut self, jac: JacobianPair<'a>) -> Self {
        self.jac = Some(jac);
        self
    }

    pub fn with_solver(mut self, solve: Box<LinearSolve<'a>>) -> Self {
        self.solve = solve;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter + 'a>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_callback<C>(mut self, callback: C) -> Self
    where
        C: FnMut(usize, &StepResult) -> Result<(), Box<dyn std::error::Error>> + 'a,
    {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn with_log(mut self, log: ContinuationLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Start a run from `y0 = (x0, lambda0)`, returning a lazy iterator of
    /// accepted [`StepResult`]s (and, as its last item, a terminal one with
    /// `success = false` if the run could not continue).
    pub fn run(self, y0: DVector<f64>) -> ContinuationRun<'a, F> {
        let control = self.config.control0.resolve(y0.len());
        let mut dymax = DVector::zeros(y0.len());
        for i in 0..y0.len() - 1 {
            dymax[i] = self.config.dxmax;
        }
        dymax[y0.len() - 1] = self.config.dlpfmax;

        if let Some(log) = &self.log {
            log.add_parameters(&self.config.to_string());
        }

        ContinuationRun {
            config: self.config,
            f: self.f,
            jac: self.jac,
            solve: self.solve,
            reporter: self.reporter,
            callback: self.callback,
            log: self.log,
            y_prev: y0,
            dymax0: dymax.clone(),
            dymax,
            control,
            rebalancer: Rebalancer::new(),
            step: 0,
            emitted_initial: false,
            finished: false,
        }
    }
}

/// A lazy, fused iterator of continuation steps.
pub struct ContinuationRun<'a, F>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a,
{
    config: ContinuationConfig,
    f: F,
    jac: Option<JacobianPair<'a>>,
    solve: Box<LinearSolve<'a>>,
    reporter: Box<dyn ProgressReporter + 'a>,
    callback: Option<Box<ObserverCallback<'a>>>,
    log: Option<ContinuationLog>,
    y_prev: DVector<f64>,
    dymax0: DVector<f64>,
    dymax: DVector<f64>,
    control: Control,
    rebalancer: Rebalancer,
    step: usize,
    emitted_initial: bool,
    finished: bool,
}

impl<'a, F> ContinuationRun<'a, F>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a,
{
    fn rebalance_params(&self) -> RebalanceParams {
        RebalanceParams {
            increase: self.config.increase,
            decrease: self.config.decrease,
            high: self.config.high,
            low: self.config.low,
            minlastfailed: self.config.minlastfailed,
            nref: 8,
        }
    }

    fn fd_settings(&self) -> FdSettings {
        FdSettings { mode: self.config.jacmode, eps: self.config.jaceps }
    }

    fn run_cycle(&self, maxiter: usize, control: Control) -> StepResult {
        newtonxt::newtonxt(
            &self.f,
            self.jac.as_ref(),
            &self.y_prev,
            control,
            &self.dymax,
            self.fd_settings(),
            maxiter,
            self.config.tol,
            &self.solve,
        )
    }
}

impl<'a, F> Iterator for ContinuationRun<'a, F>
where
    F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a,
{
    type Item = StepResult;

    fn next(&mut self) -> Option<StepResult> {
        if self.finished {
            return None;
        }

        if !self.emitted_initial {
            self.emitted_initial = true;
            self.reporter.header();
            let mut initial = self.run_cycle(0, self.control);
            // The initial materialization never iterates, so `dys` is
            // identically zero and `dominant_component` cannot pick out a
            // meaningful coordinate; honor the configured control instead.
            initial.control = self.control;
            if let Some(log) = &self.log {
                log.add_step(0, &initial.y, &initial.residual, "initial state");
            }
            return Some(initial);
        }

        loop {
            if self.step >= self.config.maxsteps {
                self.finished = true;
                return None;
            }
            self.step += 1;
            let step = self.step;

            // Predictor: a single tangent step, used to warm up the control
            // guess for the first cycle's pin target. If `maxcycles == 0` the
            // cycle loop below never runs and this leftover result is what
            // gets reported for the step, matching `contique.numcont.solve`'s
            // own fall-through behavior (its cycle loop is likewise skipped
            // entirely when `maxcycles == 0`, leaving `res` as the predictor).
            let predictor = self.run_cycle(1, self.control);

            let mut result = Some(predictor);
            for cycle in 1..=self.config.maxcycles {
                let attempt = self.run_cycle(self.config.maxiter, self.control);

                let overshoot_ok =
                    attempt.dys.iter().fold(0.0_f64, |acc, v| acc.max(v.abs())) <= self.config.overshoot;

                self.reporter.cycle(&CycleReport {
                    step,
                    cycle,
                    control_in: self.control,
                    control_out: attempt.control,
                    corrector_status: attempt.status,
                    residual_norm: attempt.residual.norm(),
                    niterations: attempt.niterations,
                    overshoot_ok,
                });

                if !attempt.success {
                    result = Some(attempt);
                    break;
                }

                if attempt.control == self.control || overshoot_ok {
                    self.control = attempt.control;
                    self.y_prev = attempt.y.clone();
                    result = Some(attempt);
                    break;
                }

                if cycle == self.config.maxcycles {
                    self.reporter.control_error(step);
                    let mut failed = attempt;
                    failed.success = false;
                    failed.message =
                        String::from("control component changed in last cycle; reduce stepwidth");
                    result = Some(failed);
                } else {
                    self.control = attempt.control;
                }
            }

            let mut result = result.expect("initialized with the predictor's result above");

            let mut rebalanced = false;
            if self.config.rebalance {
                let params = self.rebalance_params();
                let (new_dymax, did_rebalance) =
                    self.rebalancer.adjust(&self.dymax0, &self.dymax, result.success, result.niterations, &params);
                self.dymax = new_dymax;
                rebalanced = did_rebalance;
            }

            if let Some(log) = &self.log {
                log.add_step(step, &result.y, &result.residual, &result.message);
            }

            if result.success {
                if let Some(callback) = self.callback.as_mut() {
                    if let Err(e) = callback(step, &result) {
                        self.finished = true;
                        let err = CallbackError(e);
                        result.success = false;
                        result.message = err.to_string();
                        self.reporter.final_error(step, &result.message);
                        return Some(result);
                    }
                }
                return Some(result);
            }

            self.reporter.final_error(step, &result.message);
            if rebalanced {
                continue;
            }
            self.finished = true;
            return Some(result);
        }
    }
}

impl<'a, F> std::iter::FusedIterator for ContinuationRun<'a, F> where F: Fn(&DVector<f64>, f64) -> DVector<f64> + 'a {}

/// Convenience constructor mirroring `contique.numcont.solve`'s default
/// control coordinate (the load-proportionality factor, positive sign).
pub fn default_control0() -> ControlSpec {
    ControlSpec::lpf(1)
}
