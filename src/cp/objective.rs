//! Soft objective.
//!
//! Adds one minimisation variable on top of the hard model:
//!
//! ```text
//! objective = E · Σ_roles (hi_r − lo_r)
//!           + consecutive_penalty_weight · Σ_pairs y_{m,d}
//!
//! E = equity_weight · (consecutive_penalty_weight · |pairs| + 1)
//! ```
//!
//! `E` makes one unit of spread cost more than all pairs together, so the
//! two terms are ranked rather than traded: among rosters of minimal
//! spread, the fewest back-to-back pairs win.
//!
//! - **Equity**: for each role, `hi_r ≥ count(m, r)` and `lo_r ≤ count(m, r)`
//!   for every member holding at least one variable for `r`. Minimising
//!   `hi_r − lo_r` drives both to the true max/min, so the term is the
//!   per-role spread of assignment counts, a linear proxy for variance.
//! - **Anti-clustering**: for each member and each pair of adjacent days on
//!   which the member has variables, `y ≥ a_d + a_{d+1} − 1` where `a_d` is
//!   the member's (0/1, by uniqueness) assignment on day `d`.
//!
//! Only auxiliary variables are introduced; every hard-feasible assignment
//! remains feasible.

use pumpkin_solver::variables::TransformableVariable;

use super::model::{clamp_i32, RosterModel};
use crate::config::ObjectiveWeights;
use crate::error::SchedulerError;
use crate::models::MemberId;

/// Attaches the weighted soft-cost objective to a model.
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveBuilder {
    weights: ObjectiveWeights,
}

impl ObjectiveBuilder {
    /// Creates an objective builder.
    pub fn new(weights: ObjectiveWeights) -> Self {
        Self { weights }
    }

    /// Posts auxiliary variables and the objective definition.
    ///
    /// # Errors
    /// [`SchedulerError::ObjectiveOverflow`] if the objective's upper bound
    /// does not fit in `i32`.
    pub fn apply(&self, model: &mut RosterModel) -> Result<(), SchedulerError> {
        let equity_groups = if self.weights.equity_weight > 0 {
            equity_groups(model)
        } else {
            Vec::new()
        };
        let pairs = if self.weights.consecutive_penalty_weight > 0 {
            adjacent_pairs(model)
        } else {
            Vec::new()
        };

        let pair_bound = (pairs.len() as i64)
            .checked_mul(self.weights.consecutive_penalty_weight as i64);
        let spread_bound: i64 = equity_groups
            .iter()
            .map(|g| g.iter().map(Vec::len).max().unwrap_or(0) as i64)
            .sum();
        let equity_coefficient = if equity_groups.is_empty() {
            Some(0)
        } else {
            pair_bound
                .and_then(|p| p.checked_add(1))
                .and_then(|p| p.checked_mul(self.weights.equity_weight as i64))
        };
        let bound = match (equity_coefficient, pair_bound) {
            (Some(e), Some(p)) => spread_bound.checked_mul(e).and_then(|e| e.checked_add(p)),
            _ => None,
        };
        let (bound, equity_coefficient) = match (bound, equity_coefficient) {
            (Some(b), Some(e)) if b <= i32::MAX as i64 => (b, e),
            _ => {
                return Err(SchedulerError::ObjectiveOverflow {
                    bound: bound.unwrap_or(i64::MAX),
                })
            }
        };
        // Each coefficient is at most the bound whenever its term is non-empty.
        let w_equity = i32::try_from(equity_coefficient).unwrap_or(0);
        let w_pair = i32::try_from(self.weights.consecutive_penalty_weight).unwrap_or(0);

        let objective = model.new_var(0, bound as i32);
        let mut definition = vec![objective.scaled(-1)];

        for group in &equity_groups {
            let largest = clamp_i32(group.iter().map(Vec::len).max().unwrap_or(0));
            let hi = model.new_var(0, largest);
            let lo = model.new_var(0, largest);
            for vars in group {
                // hi − Σ x ≥ 0
                let mut terms = model.terms(vars, -1);
                terms.push(hi.scaled(1));
                model.post_at_least(terms, 0);
                // Σ x − lo ≥ 0
                let mut terms = model.terms(vars, 1);
                terms.push(lo.scaled(-1));
                model.post_at_least(terms, 0);
            }
            definition.push(hi.scaled(w_equity));
            definition.push(lo.scaled(-w_equity));
        }

        for (today, tomorrow) in &pairs {
            let y = model.new_var(0, 1);
            // Σ x(d) + Σ x(d+1) − y ≤ 1
            let mut terms = model.terms(today, 1);
            terms.extend(model.terms(tomorrow, 1));
            terms.push(y.scaled(-1));
            model.post_at_most(terms, 1);
            definition.push(y.scaled(w_pair));
        }

        model.post_equals(definition, 0);
        model.objective = Some(objective);
        model.stats.equity_groups = equity_groups.len();
        model.stats.equity_coefficient = equity_coefficient;
        model.stats.consecutive_pairs = pairs.len();

        tracing::debug!(
            equity_groups = equity_groups.len(),
            consecutive_pairs = pairs.len(),
            equity_coefficient,
            upper_bound = bound,
            "objective attached"
        );
        Ok(())
    }
}

/// Per role, the variable sets of every member holding that role at least
/// once. Roles with a single such member carry no spread and are skipped.
fn equity_groups(model: &RosterModel) -> Vec<Vec<Vec<usize>>> {
    let mut by_role: Vec<Vec<Vec<usize>>> = vec![Vec::new(); model.space.roles().len()];
    for (_, role, vars) in model.space.member_roles() {
        by_role[role].push(vars.to_vec());
    }
    by_role.into_iter().filter(|g| g.len() > 1).collect()
}

/// Member-day variable sets for every pair of adjacent days.
fn adjacent_pairs(model: &RosterModel) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut pairs = Vec::new();
    let mut previous: Option<(MemberId, usize, &[usize])> = None;
    for (member_id, day, vars) in model.space.member_days() {
        if let Some((prev_member, prev_day, prev_vars)) = previous {
            if prev_member == member_id && prev_day + 1 == day {
                pairs.push((prev_vars.to_vec(), vars.to_vec()));
            }
        }
        previous = Some((member_id, day, vars));
    }
    pairs
}
