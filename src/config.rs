//! Run configuration.
//!
//! Everything the core consumes besides the input entities: the horizon,
//! the rolling-window length, the objective weights and the solve budget.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `window_days` | 31 |
//! | `weights.equity_weight` | 10 |
//! | `weights.consecutive_penalty_weight` | 1 |
//! | `budget` | unlimited |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SchedulerError;
use crate::models::Horizon;

/// Default rolling-window length in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 31;

/// Relative priority of the soft objective terms.
///
/// Whenever both weights are non-zero, fairness ranks strictly above
/// clustering: the objective scales the equity coefficient so that one unit
/// of per-role spread costs more than every back-to-back pair of the model
/// together. `consecutive_penalty_weight` then only orders rosters of equal
/// spread. Setting `equity_weight` to zero leaves clustering alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Weight of the per-role spread (max - min assignment count).
    pub equity_weight: u32,
    /// Weight of each pair of assignments on adjacent dates.
    pub consecutive_penalty_weight: u32,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            equity_weight: 10,
            consecutive_penalty_weight: 1,
        }
    }
}

impl ObjectiveWeights {
    /// Creates weights.
    pub fn new(equity_weight: u32, consecutive_penalty_weight: u32) -> Self {
        Self {
            equity_weight,
            consecutive_penalty_weight,
        }
    }

    /// Whether both terms are switched off (pure feasibility solve).
    pub fn is_zero(&self) -> bool {
        self.equity_weight == 0 && self.consecutive_penalty_weight == 0
    }
}

/// Limits for the single solver invocation.
///
/// All limits unset means the search runs until optimality or
/// infeasibility is proven. Any limit that fires after a roster was found
/// yields `Feasible`; one that fires before yields `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveBudget {
    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Maximum number of budget checks, roughly one per search step.
    pub iteration_limit: Option<u64>,
    /// Stop once this many improving rosters have been found.
    #[serde(default)]
    pub solution_limit: Option<u64>,
}

impl SolveBudget {
    /// No limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Wall-clock limit only.
    pub fn time_limit(limit: Duration) -> Self {
        Self {
            time_limit_ms: Some(limit.as_millis() as u64),
            ..Self::default()
        }
    }

    /// Iteration limit only.
    pub fn iterations(limit: u64) -> Self {
        Self {
            iteration_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Solution limit only. `solutions(1)` returns the first roster found.
    pub fn solutions(limit: u64) -> Self {
        Self {
            solution_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Adds an iteration limit.
    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    /// Adds a solution limit.
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    /// Whether any limit is set.
    pub fn is_limited(&self) -> bool {
        self.time_limit_ms.is_some()
            || self.iteration_limit.is_some()
            || self.solution_limit.is_some()
    }
}

/// Configuration of one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Days covered by the solve.
    pub horizon: Horizon,
    /// Rolling fatigue window length (days).
    pub window_days: u32,
    /// Soft objective weights.
    pub weights: ObjectiveWeights,
    /// Solver limits.
    pub budget: SolveBudget,
}

impl SchedulerConfig {
    /// Creates a config for `[start, end]` with default window, weights and
    /// an unlimited budget.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            horizon: Horizon::new(start, end),
            window_days: DEFAULT_WINDOW_DAYS,
            weights: ObjectiveWeights::default(),
            budget: SolveBudget::unlimited(),
        }
    }

    /// Sets the rolling-window length.
    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    /// Sets the objective weights.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the solve budget.
    pub fn with_budget(mut self, budget: SolveBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Checks the horizon and window.
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.horizon.is_empty() {
            return Err(SchedulerError::InvalidHorizon {
                start: self.horizon.start,
                end: self.horizon.end,
            });
        }
        if self.window_days == 0 {
            return Err(SchedulerError::InvalidWindow);
        }
        Ok(())
    }
}
