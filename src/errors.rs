//! Continuation errors.
//!
//! Mirrors the teacher crate's convention: hand-rolled `Display`/`Debug`/
//! [`std::error::Error`] implementations rather than a derive-macro crate,
//! since almost every failure mode here is recovered internally (spec.md
//! §7) and only needs a message, not a typed payload the caller branches on.

use std::error::Error;
use std::fmt;

/// Failure of a single Newton corrector attempt (spec.md §7, points 1-2).
///
/// Both variants are recovered by the continuation driver: they mark a
/// cycle (and possibly the enclosing step) as failed, they never abort the
/// run by themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectorFailure {
    /// The linear solve of the augmented Jacobian broke down (singular or
    /// the solver otherwise could not produce a step). The corrector's
    /// state has been set to NaN.
    SingularJacobian,
    /// The corrector exhausted `maxiter` iterations without reaching `tol`.
    NonConvergence { niterations: usize },
}

impl fmt::Display for CorrectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CorrectorFailure::SingularJacobian => {
                write!(f, "linear solve failed: singular augmented Jacobian")
            }
            CorrectorFailure::NonConvergence { niterations } => {
                write!(f, "Newton process failed to converge in {} iterations", niterations)
            }
        }
    }
}

impl Error for CorrectorFailure {}

/// Error that propagates out of [`crate::continuation::ContinuationRun`]
/// and terminates the run (spec.md §7, point 5).
///
/// Every other failure mode (corrector non-convergence, control-switch
/// exhaustion, step failure without rebalancing progress) is recovered into
/// a terminal [`crate::newton::StepResult`] with `success = false`, per
/// spec.md's error taxonomy; only a callback exception has no recovery path
/// in the control flow and is surfaced as a hard error instead.
#[derive(Debug)]
pub struct CallbackError(pub Box<dyn Error>);

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "observer callback failed: {}", self.0)
    }
}

impl Error for CallbackError {}
