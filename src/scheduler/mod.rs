//! End-to-end scheduling and roster KPIs.
//!
//! `RosterScheduler` wires demand resolution, the CP model, the objective
//! and the single solve together. `RosterKpi` measures the result.
//!
//! # References
//!
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

mod kpi;
mod roster;

pub use kpi::RosterKpi;
pub use roster::{RosterInput, RosterOutcome, RosterScheduler};
