//! Constraint-programming formulation of the rostering problem.
//!
//! Pipeline:
//!
//! 1. [`VariableSpace`]: sparse `x[member, day, role]` keys.
//! 2. [`RosterCpBuilder`]: 0/1 variables plus coverage, uniqueness and
//!    rolling-window fatigue constraints.
//! 3. [`ObjectiveBuilder`]: weighted equity + anti-clustering objective.
//! 4. [`SolveCoordinator`]: one budgeted pumpkin solve, four-way outcome.
//! 5. [`SolutionExtractor`]: true variables back to a [`crate::models::Roster`].
//!
//! # Reference
//! - Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

mod extract;
mod model;
mod objective;
mod solve;
mod space;

pub use extract::SolutionExtractor;
pub use model::{ModelStats, RosterCpBuilder, RosterModel};
pub use objective::ObjectiveBuilder;
pub use solve::{SolveCoordinator, SolveStatus, SolvedModel};
pub use space::{AssignmentKey, DemandSlot, VariableSpace};
