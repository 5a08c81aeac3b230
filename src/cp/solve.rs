//! Single-shot solve and outcome classification.
//!
//! The coordinator runs pumpkin's linear SAT-UNSAT minimisation exactly
//! once and maps its result onto four distinct outcomes:
//!
//! | pumpkin | [`SolveStatus`] | Meaning |
//! |---------|-----------------|---------|
//! | `Optimal` | `Optimal` | objective proven minimal |
//! | `Satisfiable` | `Feasible` | hard constraints met, optimality unproven |
//! | `Unsatisfiable` | `Infeasible` | no assignment satisfies the hard model |
//! | `Unknown` | `Unknown` | budget exhausted before any solution |
//!
//! `Unknown` is never reported as `Infeasible`: running out of budget says
//! nothing about whether a roster exists.

use pumpkin_solver::branching::Brancher;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::solution_callback::SolutionCallback;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution, SolutionReference};
use pumpkin_solver::termination::TerminationCondition;
use pumpkin_solver::Solver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::model::{ModelStats, RosterModel};
use super::space::VariableSpace;
use crate::config::SolveBudget;

/// Terminal outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found; optimality not proven within the budget.
    Feasible,
    /// Proven that no assignment satisfies the hard constraints.
    Infeasible,
    /// Budget exhausted with neither a solution nor a proof of infeasibility.
    Unknown,
}

impl SolveStatus {
    /// Whether a roster is available.
    #[inline]
    pub fn has_solution(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "OPTIMAL"),
            SolveStatus::Feasible => write!(f, "FEASIBLE"),
            SolveStatus::Infeasible => write!(f, "INFEASIBLE"),
            SolveStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Result of the single solver invocation.
///
/// Holds the variable space so the assignment can be mapped back to
/// domain triples by [`super::SolutionExtractor`].
#[derive(Debug, Clone)]
pub struct SolvedModel {
    /// Outcome classification.
    pub status: SolveStatus,
    /// Objective value of the returned assignment.
    pub objective: Option<i64>,
    /// Wall-clock time spent in the solver.
    pub elapsed: Duration,
    /// Whether the budget stopped the search.
    pub budget_exhausted: bool,
    /// Size of the solved model.
    pub stats: ModelStats,
    pub(crate) space: VariableSpace,
    pub(crate) values: Vec<bool>,
}

impl SolvedModel {
    /// The variable space of the solved model.
    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    /// Truth value per variable, in key order. Empty without a solution.
    pub fn values(&self) -> &[bool] {
        &self.values
    }
}

/// Counts the improving solutions reported during optimisation.
struct SolutionCounter<'a> {
    found: &'a AtomicU64,
}

impl<B: Brancher> SolutionCallback<B> for SolutionCounter<'_> {
    fn on_solution_callback(&self, _: &Solver, _: SolutionReference<'_>, _: &B) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }
}

/// Termination condition enforcing a [`SolveBudget`].
#[derive(Debug)]
struct BudgetTermination<'a> {
    deadline: Option<Instant>,
    remaining: Option<u64>,
    solution_limit: Option<u64>,
    solutions_found: &'a AtomicU64,
    fired: bool,
}

impl<'a> BudgetTermination<'a> {
    fn starting_now(budget: &SolveBudget, solutions_found: &'a AtomicU64) -> Self {
        Self {
            deadline: budget
                .time_limit_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
            remaining: budget.iteration_limit,
            solution_limit: budget.solution_limit,
            solutions_found,
            fired: false,
        }
    }
}

impl TerminationCondition for BudgetTermination<'_> {
    fn should_stop(&mut self) -> bool {
        if self.fired {
            return true;
        }
        if let Some(limit) = self.solution_limit {
            if self.solutions_found.load(Ordering::Relaxed) >= limit {
                self.fired = true;
                return true;
            }
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                self.fired = true;
                return true;
            }
            *remaining -= 1;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                self.fired = true;
            }
        }
        self.fired
    }
}

/// Runs the solver once under a budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveCoordinator {
    budget: SolveBudget,
}

impl SolveCoordinator {
    /// Creates a coordinator with the given budget.
    pub fn new(budget: SolveBudget) -> Self {
        Self { budget }
    }

    /// The budget enforced on the solve.
    pub fn budget(&self) -> &SolveBudget {
        &self.budget
    }

    /// Solves the model. Consumes it: models are single-use.
    ///
    /// A model already proven infeasible while posting constraints is
    /// classified without entering search. A model without an objective is
    /// solved for feasibility (constant zero objective).
    pub fn solve(&self, model: RosterModel) -> SolvedModel {
        let start = Instant::now();
        let RosterModel {
            mut solver,
            space,
            vars,
            objective,
            root_infeasible,
            stats,
        } = model;

        if root_infeasible {
            tracing::info!(status = %SolveStatus::Infeasible, "model infeasible at root");
            return SolvedModel {
                status: SolveStatus::Infeasible,
                objective: None,
                elapsed: start.elapsed(),
                budget_exhausted: false,
                stats,
                space,
                values: Vec::new(),
            };
        }

        let objective = objective.unwrap_or_else(|| solver.new_bounded_integer(0, 0));
        let mut brancher = solver.default_brancher();
        let solutions_found = AtomicU64::new(0);
        let mut termination = BudgetTermination::starting_now(&self.budget, &solutions_found);

        let result = solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(
                OptimisationDirection::Minimise,
                objective,
                SolutionCounter {
                    found: &solutions_found,
                },
            ),
        );

        let outcome: (SolveStatus, Vec<bool>, Option<i64>) = match result {
            OptimisationResult::Optimal(solution) => (
                SolveStatus::Optimal,
                vars.iter().map(|&v| solution.get_integer_value(v) == 1).collect(),
                Some(solution.get_integer_value(objective) as i64),
            ),
            OptimisationResult::Satisfiable(solution) => (
                SolveStatus::Feasible,
                vars.iter().map(|&v| solution.get_integer_value(v) == 1).collect(),
                Some(solution.get_integer_value(objective) as i64),
            ),
            OptimisationResult::Unsatisfiable => (SolveStatus::Infeasible, Vec::new(), None),
            OptimisationResult::Unknown => (SolveStatus::Unknown, Vec::new(), None),
        };
        let (status, values, objective_value) = outcome;

        let elapsed = start.elapsed();
        tracing::info!(
            status = %status,
            objective = ?objective_value,
            elapsed_ms = elapsed.as_millis() as u64,
            solutions = solutions_found.load(Ordering::Relaxed),
            budget_exhausted = termination.fired,
            "solve finished"
        );

        SolvedModel {
            status,
            objective: objective_value,
            elapsed,
            budget_exhausted: termination.fired,
            stats,
            space,
            values,
        }
    }
}
