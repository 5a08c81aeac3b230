//! End-to-end roster scheduler.
//!
//! # Algorithm
//!
//! 1. Resolve demand (templates + overrides).
//! 2. Index unavailability.
//! 3. Build the hard model (sparse variables, coverage, uniqueness,
//!    rolling-window fatigue).
//! 4. Attach the weighted objective.
//! 5. Solve once under the configured budget.
//! 6. Extract the roster when the outcome is `Optimal` or `Feasible`.
//!
//! Each run is a fresh, complete computation; nothing is carried over
//! between runs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::cp::{
    ModelStats, ObjectiveBuilder, RosterCpBuilder, SolutionExtractor, SolveCoordinator,
    SolveStatus,
};
use crate::demand::DemandResolver;
use crate::error::SchedulerError;
use crate::models::{
    AvailabilityIndex, CustomDemandOverride, EventInstance, Member, ResolvedDemand, Roster,
    ServiceTemplate, UnavailabilityRecord,
};

/// Validated, identifier-keyed input of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterInput {
    /// Members.
    pub members: Vec<Member>,
    /// Blocked (member, date) pairs.
    pub unavailability: Vec<UnavailabilityRecord>,
    /// Template rows.
    pub templates: Vec<ServiceTemplate>,
    /// Dated events.
    pub events: Vec<EventInstance>,
    /// Date-specific overrides.
    pub overrides: Vec<CustomDemandOverride>,
}

impl RosterInput {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Adds an unavailability record.
    pub fn with_unavailability(mut self, record: UnavailabilityRecord) -> Self {
        self.unavailability.push(record);
        self
    }

    /// Adds a template row.
    pub fn with_template(mut self, template: ServiceTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Adds an event.
    pub fn with_event(mut self, event: EventInstance) -> Self {
        self.events.push(event);
        self
    }

    /// Adds an override.
    pub fn with_override(mut self, custom: CustomDemandOverride) -> Self {
        self.overrides.push(custom);
        self
    }
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct RosterOutcome {
    /// Outcome classification.
    pub status: SolveStatus,
    /// The roster, present iff `status` is `Optimal` or `Feasible`.
    pub roster: Option<Roster>,
    /// Objective value of the roster.
    pub objective: Option<i64>,
    /// Demand the model was built from.
    pub demand: Vec<ResolvedDemand>,
    /// Model size.
    pub stats: ModelStats,
    /// Time spent in the solver.
    pub elapsed: Duration,
    /// Whether the solve budget stopped the search.
    pub budget_exhausted: bool,
}

impl RosterOutcome {
    /// Whether a roster was produced.
    pub fn is_solved(&self) -> bool {
        self.roster.is_some()
    }
}

/// One-shot global roster scheduler.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_cp::config::SchedulerConfig;
/// use roster_cp::cp::SolveStatus;
/// use roster_cp::models::{EventInstance, Member, ServiceTemplate};
/// use roster_cp::scheduler::{RosterInput, RosterScheduler};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
/// let sunday = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
///
/// let input = RosterInput::new()
///     .with_member(Member::new(1).with_role("vocal").with_max_shifts(4))
///     .with_template(ServiceTemplate::new("service", "vocal", 1, 1))
///     .with_event(EventInstance::new(sunday, "service"));
///
/// let outcome = RosterScheduler::new(SchedulerConfig::new(start, end)).run(&input).unwrap();
/// assert_eq!(outcome.status, SolveStatus::Optimal);
/// assert_eq!(outcome.roster.unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RosterScheduler {
    config: SchedulerConfig,
}

impl RosterScheduler {
    /// Creates a scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// The run configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs the full pipeline once.
    ///
    /// # Errors
    /// Only configuration problems. Infeasible or timed-out solves are
    /// reported through [`RosterOutcome::status`].
    #[tracing::instrument(level = "debug", name = "roster run", skip_all, fields(
        start = %self.config.horizon.start,
        end = %self.config.horizon.end,
    ))]
    pub fn run(&self, input: &RosterInput) -> Result<RosterOutcome, SchedulerError> {
        self.config.validate()?;

        let demand = DemandResolver::new(&input.templates).resolve(&input.events, &input.overrides);
        let availability = AvailabilityIndex::new(&input.unavailability);

        let mut model = RosterCpBuilder::new(
            self.config.horizon,
            &input.members,
            &demand,
            &availability,
        )
        .with_window_days(self.config.window_days)
        .build();
        ObjectiveBuilder::new(self.config.weights).apply(&mut model)?;

        let solved = SolveCoordinator::new(self.config.budget).solve(model);
        let roster = SolutionExtractor::new().extract(&solved).ok();

        Ok(RosterOutcome {
            status: solved.status,
            roster,
            objective: solved.objective,
            demand,
            stats: solved.stats,
            elapsed: solved.elapsed,
            budget_exhausted: solved.budget_exhausted,
        })
    }
}
