//! Volunteer rostering as a single global constraint model.
//!
//! Assigns members to roles across a calendar of events in one solve,
//! rather than greedily day by day. Hard rules (eligibility, availability,
//! one role per day, coverage bounds, rolling-window fatigue) are never
//! violated; soft criteria (fairness within each role, avoiding
//! back-to-back days) are minimised on top.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Member`, `ServiceTemplate`, `EventInstance`,
//!   `CustomDemandOverride`, `ResolvedDemand`, `Horizon`, `AvailabilityIndex`,
//!   `Roster`
//! - **`demand`**: Template/override merge into per-day, per-role demand
//! - **`cp`**: Variable space, hard constraints, objective, solve, extraction
//! - **`scheduler`**: End-to-end runner and roster KPIs
//! - **`config`**: Horizon, window length, weights, solve budget
//! - **`validation`**: Input integrity checks for the loading layer
//!
//! # Architecture
//!
//! The combinatorial search itself is `pumpkin-solver`. This crate builds
//! the model, runs it once, and classifies the outcome as
//! `Optimal`, `Feasible`, `Infeasible` or `Unknown`. Reading tabular files,
//! name resolution and rendering are left to callers.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

pub mod config;
pub mod cp;
pub mod demand;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{ObjectiveWeights, SchedulerConfig, SolveBudget};
pub use cp::SolveStatus;
pub use error::SchedulerError;
pub use scheduler::{RosterInput, RosterOutcome, RosterScheduler};
