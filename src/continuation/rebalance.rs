//! Step-width rebalancing (component G).
//!
//! Mirrors `contique.numcont.adjust`: reward a run of fast-converging steps
//! by growing `dymax`, shrink it on a failed cycle, and always clamp the
//! result to `[low, high] * dymax0` componentwise.

use nalgebra::DVector;

/// Knobs threaded through from [`crate::continuation::config::ContinuationConfig`].
#[derive(Debug, Copy, Clone)]
pub struct RebalanceParams {
    pub increase: f64,
    pub decrease: f64,
    pub high: f64,
    pub low: f64,
    pub minlastfailed: usize,
    /// Reference iteration count a step is compared against when rewarding
    /// fast convergence (`contique`'s hardcoded reference of 8).
    pub nref: usize,
}

impl Default for RebalanceParams {
    fn default() -> Self {
        RebalanceParams {
            increase: 0.5,
            decrease: 2.0,
            high: 10.0,
            low: 1e-6,
            minlastfailed: 3,
            nref: 8,
        }
    }
}

/// Tracks the run of consecutive successful steps since the last failure,
/// so growth only kicks in once convergence has been fast for a while.
#[derive(Debug, Clone)]
pub struct Rebalancer {
    lastfailed: usize,
}

impl Rebalancer {
    pub fn new() -> Self {
        Rebalancer { lastfailed: 0 }
    }

    /// Adjust `xn` (the current `dymax`) against `x0` (the initial `dymax`),
    /// given whether the step that just completed succeeded and in how many
    /// iterations.
    ///
    /// Returns the new `dymax` and whether it differs from `xn` (`contique`
    /// signals "no rebalancing occurred" by comparing the first component of
    /// the pre- and post-clamp vectors, an odd but exact detail of the
    /// original that this preserves).
    pub fn adjust(
        &mut self,
        x0: &DVector<f64>,
        xn: &DVector<f64>,
        success: bool,
        niterations: usize,
        params: &RebalanceParams,
    ) -> (DVector<f64>, bool) {
        let x = if success {
            self.lastfailed += 1;
            if self.lastfailed >= params.minlastfailed {
                let reward = (params.nref as f64 - niterations.min(params.nref) as f64)
                    / params.nref as f64
                    * params.increase;
                xn * (1.0 + reward)
            } else {
                xn.clone()
            }
        } else {
            self.lastfailed = 0;
            xn / params.decrease
        };

        let mut y = x.clone();
        for i in 0..y.len() {
            let ratio = (x[i] / x0[i]).clamp(params.low, params.high);
            y[i] = ratio * x0[i];
        }

        let rebalanced = y[0] != xn[0];
        (y, rebalanced)
    }
}

impl Default for Rebalancer {
    fn default() -> Self {
        Self::new()
    }
}
