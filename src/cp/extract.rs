//! Solution extraction.
//!
//! Maps the truth values of a solved model back to
//! `(member, date, role)` triples.

use super::solve::{SolveStatus, SolvedModel};
use crate::models::{Assignment, Roster};

/// Reads assignments out of a solved model.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionExtractor;

impl SolutionExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extracts the roster of an `Optimal` or `Feasible` model.
    ///
    /// # Errors
    /// The model's status, unchanged, when it is `Infeasible` or `Unknown`.
    pub fn extract(&self, solved: &SolvedModel) -> Result<Roster, SolveStatus> {
        if !solved.status.has_solution() {
            return Err(solved.status);
        }

        let space = solved.space();
        let assignments: Vec<Assignment> = space
            .keys()
            .iter()
            .zip(solved.values())
            .filter(|(_, value)| **value)
            .map(|(key, _)| {
                let (member_id, date, role) = space.describe(key);
                Assignment::new(member_id, date, role)
            })
            .collect();

        tracing::debug!(assignments = assignments.len(), "roster extracted");
        Ok(Roster::from_assignments(assignments))
    }
}
