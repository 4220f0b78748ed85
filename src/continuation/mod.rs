//! The continuation driver and its supporting ambient stack: configuration,
//! step-width rebalancing, progress reporting and file logging.

pub mod config;
pub mod driver;
pub mod log;
pub mod rebalance;
pub mod report;

pub use config::ContinuationConfig;
pub use driver::{ContinuationDriver, ContinuationRun};
pub use log::ContinuationLog;
pub use rebalance::{RebalanceParams, Rebalancer};
pub use report::{CycleReport, NullReporter, ProgressReporter, StdoutReporter};
