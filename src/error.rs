//! Errors raised before a solve can start.
//!
//! Solve outcomes (infeasible, timed out) are not errors: they are
//! reported through [`crate::cp::SolveStatus`].

use chrono::NaiveDate;
use thiserror::Error;

/// Configuration or model-size errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Horizon end {end} is before start {start}")]
    InvalidHorizon { start: NaiveDate, end: NaiveDate },

    #[error("Rolling window must span at least one day")]
    InvalidWindow,

    #[error("Objective upper bound {bound} does not fit the solver's integer domain")]
    ObjectiveOverflow { bound: i64 },
}
