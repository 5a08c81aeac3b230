//! Hard-constraint model.
//!
//! Translates members, resolved demand and availability into a pumpkin
//! `Solver` holding one 0/1 integer variable per [`AssignmentKey`] and the
//! hard constraints:
//!
//! | Family | Constraint |
//! |--------|------------|
//! | Coverage | `min_qty ≤ Σ x[*, d, r] ≤ max_qty` for every demand slot |
//! | Uniqueness | `Σ x[m, d, *] ≤ 1` for every member-day |
//! | Fatigue | `Σ x[m, d..d+W-1, *] ≤ max_shifts(m)` for every start day `d` |
//!
//! Eligibility and availability are not posted: they are the sparsity rule
//! of [`VariableSpace`].
//!
//! Constraints that are trivially satisfied (e.g. a window holding fewer
//! active days than the cap) are not posted. A window whose active days
//! are a subset of a neighbouring window's is implied by it and skipped.
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering: A review of
//! applications, methods and models"

use pumpkin_solver::constraints as cp;
use pumpkin_solver::variables::{AffineView, DomainId, TransformableVariable};
use pumpkin_solver::Solver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::space::{AssignmentKey, VariableSpace};
use crate::config::DEFAULT_WINDOW_DAYS;
use crate::models::{AvailabilityIndex, Horizon, Member, MemberId, ResolvedDemand};

/// Size of a built model, per constraint family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    /// Decision variables.
    pub variables: usize,
    /// Demand slots inside the horizon.
    pub demand_slots: usize,
    /// Demand rows dated outside the horizon.
    pub out_of_horizon: usize,
    /// Coverage constraints posted (lower and upper bounds counted apart).
    pub coverage_constraints: usize,
    /// Slots whose minimum cannot be met by any candidate.
    pub uncoverable_slots: usize,
    /// Uniqueness constraints posted.
    pub uniqueness_constraints: usize,
    /// Rolling-window constraints posted.
    pub window_constraints: usize,
    /// Role groups in the equity term.
    pub equity_groups: usize,
    /// Objective coefficient of one unit of spread.
    pub equity_coefficient: i64,
    /// Adjacent-day pairs in the anti-clustering term.
    pub consecutive_pairs: usize,
}

/// A built model, ready for one solve.
///
/// Owns the solver. [`super::SolveCoordinator::solve`] consumes it, so a
/// model can never be solved twice or concurrently.
pub struct RosterModel {
    pub(crate) solver: Solver,
    pub(crate) space: VariableSpace,
    pub(crate) vars: Vec<DomainId>,
    pub(crate) objective: Option<DomainId>,
    pub(crate) root_infeasible: bool,
    pub(crate) stats: ModelStats,
}

impl RosterModel {
    /// The variable space.
    pub fn space(&self) -> &VariableSpace {
        &self.space
    }

    /// Model size.
    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }

    /// Whether posting already proved the model infeasible.
    pub fn is_root_infeasible(&self) -> bool {
        self.root_infeasible
    }

    /// Whether an objective has been attached.
    pub fn has_objective(&self) -> bool {
        self.objective.is_some()
    }

    /// Sum view over a set of variable indices, each scaled by `coeff`.
    pub(crate) fn terms(&self, indices: &[usize], coeff: i32) -> Vec<AffineView<DomainId>> {
        indices.iter().map(|&i| self.vars[i].scaled(coeff)).collect()
    }

    pub(crate) fn new_var(&mut self, lb: i32, ub: i32) -> DomainId {
        self.solver.new_bounded_integer(lb, ub)
    }

    /// Posts `Σ terms ≤ rhs`.
    pub(crate) fn post_at_most(&mut self, terms: Vec<AffineView<DomainId>>, rhs: i32) {
        if self.root_infeasible {
            return;
        }
        let tag = self.solver.new_constraint_tag();
        if self
            .solver
            .add_constraint(cp::less_than_or_equals(terms, rhs, tag))
            .post()
            .is_err()
        {
            self.mark_infeasible("less-than-or-equals");
        }
    }

    /// Posts `Σ terms ≥ rhs`.
    pub(crate) fn post_at_least(&mut self, terms: Vec<AffineView<DomainId>>, rhs: i32) {
        if self.root_infeasible {
            return;
        }
        let tag = self.solver.new_constraint_tag();
        if self
            .solver
            .add_constraint(cp::greater_than_or_equals(terms, rhs, tag))
            .post()
            .is_err()
        {
            self.mark_infeasible("greater-than-or-equals");
        }
    }

    /// Posts `Σ terms = rhs`.
    pub(crate) fn post_equals(&mut self, terms: Vec<AffineView<DomainId>>, rhs: i32) {
        if self.root_infeasible {
            return;
        }
        let tag = self.solver.new_constraint_tag();
        if self
            .solver
            .add_constraint(cp::equals(terms, rhs, tag))
            .post()
            .is_err()
        {
            self.mark_infeasible("equals");
        }
    }

    pub(crate) fn mark_infeasible(&mut self, what: &str) {
        tracing::warn!(constraint = what, "root propagation proved the model infeasible");
        self.root_infeasible = true;
    }
}

/// Builds the hard-constraint model.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use roster_cp::cp::RosterCpBuilder;
/// use roster_cp::models::{AvailabilityIndex, DemandSource, Horizon, Member, ResolvedDemand};
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
/// let members = vec![Member::new(1).with_role("vocal").with_max_shifts(2)];
/// let demand = vec![ResolvedDemand {
///     date: day,
///     role: "vocal".into(),
///     min_qty: 1,
///     max_qty: 1,
///     source: DemandSource::Override,
/// }];
/// let availability = AvailabilityIndex::default();
///
/// let horizon = Horizon::new(day, day);
/// let model = RosterCpBuilder::new(horizon, &members, &demand, &availability).build();
/// assert_eq!(model.stats().variables, 1);
/// ```
pub struct RosterCpBuilder<'a> {
    horizon: Horizon,
    members: &'a [Member],
    demand: &'a [ResolvedDemand],
    availability: &'a AvailabilityIndex,
    window_days: u32,
}

impl<'a> RosterCpBuilder<'a> {
    /// Creates a builder with the default 31-day window.
    pub fn new(
        horizon: Horizon,
        members: &'a [Member],
        demand: &'a [ResolvedDemand],
        availability: &'a AvailabilityIndex,
    ) -> Self {
        Self {
            horizon,
            members,
            demand,
            availability,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Sets the rolling-window length (days, at least 1).
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days.max(1);
        self
    }

    /// Creates the variables and posts all hard constraints.
    ///
    /// Never pre-checks feasibility; an impossible model is reported by
    /// the solve as infeasible.
    pub fn build(&self) -> RosterModel {
        let space = VariableSpace::new(&self.horizon, self.members, self.demand, self.availability);
        if space.out_of_horizon() > 0 {
            tracing::warn!(
                rows = space.out_of_horizon(),
                start = %self.horizon.start,
                end = %self.horizon.end,
                "demand outside the horizon ignored"
            );
        }

        let mut solver = Solver::default();
        let vars: Vec<DomainId> = space
            .keys()
            .iter()
            .map(|_| solver.new_bounded_integer(0, 1))
            .collect();

        let stats = ModelStats {
            variables: vars.len(),
            demand_slots: space.slots().len(),
            out_of_horizon: space.out_of_horizon(),
            ..ModelStats::default()
        };

        let mut model = RosterModel {
            solver,
            space,
            vars,
            objective: None,
            root_infeasible: false,
            stats,
        };

        self.post_coverage(&mut model);
        self.post_uniqueness(&mut model);
        self.post_rolling_windows(&mut model);

        tracing::debug!(
            variables = model.stats.variables,
            coverage = model.stats.coverage_constraints,
            uniqueness = model.stats.uniqueness_constraints,
            windows = model.stats.window_constraints,
            "hard model built"
        );
        model
    }

    fn post_coverage(&self, model: &mut RosterModel) {
        let slots = model.space.slots().to_vec();
        for slot in slots {
            let candidates = model.space.for_slot(slot.day, slot.role).to_vec();
            if candidates.len() < slot.min_qty as usize {
                // No combination of candidates reaches the minimum.
                model.stats.uncoverable_slots += 1;
                if candidates.is_empty() {
                    model.mark_infeasible("coverage");
                    continue;
                }
            }
            if slot.min_qty > 0 {
                let terms = model.terms(&candidates, 1);
                model.post_at_least(terms, clamp_i32(slot.min_qty as usize));
                model.stats.coverage_constraints += 1;
            }
            if (slot.max_qty as usize) < candidates.len() {
                let terms = model.terms(&candidates, 1);
                model.post_at_most(terms, clamp_i32(slot.max_qty as usize));
                model.stats.coverage_constraints += 1;
            }
        }
    }

    fn post_uniqueness(&self, model: &mut RosterModel) {
        let groups: Vec<Vec<usize>> = model
            .space
            .member_days()
            .filter(|(_, _, vars)| vars.len() > 1)
            .map(|(_, _, vars)| vars.to_vec())
            .collect();
        for vars in groups {
            let terms = model.terms(&vars, 1);
            model.post_at_most(terms, 1);
            model.stats.uniqueness_constraints += 1;
        }
    }

    fn post_rolling_windows(&self, model: &mut RosterModel) {
        let caps: HashMap<MemberId, u32> =
            self.members.iter().map(|m| (m.id, m.max_shifts)).collect();
        let mut member_ids: Vec<MemberId> =
            model.space.keys().iter().map(|k| k.member_id).collect();
        member_ids.sort_unstable();
        member_ids.dedup();

        let horizon_days = self.horizon.len_days();
        for member_id in member_ids {
            let cap = caps.get(&member_id).copied().unwrap_or(0) as usize;
            let active = model.space.active_days(member_id);
            for (lo, hi) in window_ranges(&active, horizon_days, self.window_days as usize) {
                if hi - lo <= cap {
                    continue;
                }
                let vars: Vec<usize> = active[lo..hi]
                    .iter()
                    .flat_map(|&day| model.space.for_member_day(member_id, day).to_vec())
                    .collect();
                let terms = model.terms(&vars, 1);
                model.post_at_most(terms, clamp_i32(cap));
                model.stats.window_constraints += 1;
            }
        }
    }
}

/// Maximal rolling-window ranges over a member's active days.
///
/// `active` holds ascending day offsets. For every start day `d` in
/// `0..horizon_days` the window `[d, d + window)` selects a contiguous
/// index range `[lo, hi)` of `active`. Empty ranges and ranges contained in
/// another window's range are dropped; capping the remaining ones caps
/// every window.
pub(crate) fn window_ranges(
    active: &[usize],
    horizon_days: usize,
    window: usize,
) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let (mut lo, mut hi) = (0, 0);
    for start in 0..horizon_days {
        while lo < active.len() && active[lo] < start {
            lo += 1;
        }
        if hi < lo {
            hi = lo;
        }
        while hi < active.len() && active[hi] < start + window {
            hi += 1;
        }
        if lo < hi && ranges.last() != Some(&(lo, hi)) {
            ranges.push((lo, hi));
        }
    }

    let n = ranges.len();
    (0..n)
        .filter(|&k| {
            let grows_right = k == 0 || ranges[k].1 != ranges[k - 1].1;
            let grows_left = k + 1 == n || ranges[k + 1].0 != ranges[k].0;
            grows_right && grows_left
        })
        .map(|k| ranges[k])
        .collect()
}

#[inline]
pub(crate) fn clamp_i32(v: usize) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DemandSource, UnavailabilityRecord};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn demand(day: u32, role: &str, min_qty: u32, max_qty: u32) -> ResolvedDemand {
        ResolvedDemand {
            date: d(day),
            role: role.into(),
            min_qty,
            max_qty,
            source: DemandSource::Override,
        }
    }

    #[test]
    fn test_window_ranges_single_window() {
        // All active days fit inside one window.
        let ranges = window_ranges(&[0, 3, 6], 10, 31);
        assert_eq!(ranges, vec![(0, 3)]);
    }

    #[test]
    fn test_window_ranges_sliding() {
        // Window of 3 days over active days 0,1,2,3.
        let ranges = window_ranges(&[0, 1, 2, 3], 4, 3);
        assert_eq!(ranges, vec![(0, 3), (1, 4)]);
    }

    #[test]
    fn test_window_ranges_gaps() {
        let ranges = window_ranges(&[0, 10], 20, 5);
        assert_eq!(ranges, vec![(0, 1), (1, 2)]);
        assert!(window_ranges(&[], 20, 5).is_empty());
    }

    #[test]
    fn test_window_ranges_cross_boundary() {
        // Shifts in the last week of one "month" and the first weeks of the
        // next share a window even though no calendar month holds all four.
        let active = [24, 27, 31, 34];
        let ranges = window_ranges(&active, 62, 31);
        assert!(ranges.contains(&(0, 4)));
    }

    #[test]
    fn test_build_counts() {
        let members = vec![
            Member::new(1).with_roles(["vocal", "guitar"]).with_max_shifts(1),
            Member::new(2).with_role("vocal").with_max_shifts(5),
        ];
        let demand = vec![
            demand(6, "vocal", 1, 1),
            demand(6, "guitar", 0, 1),
            demand(13, "vocal", 1, 2),
        ];
        let availability = AvailabilityIndex::default();
        let horizon = Horizon::new(d(1), d(31));
        let model = RosterCpBuilder::new(horizon, &members, &demand, &availability).build();

        let stats = model.stats();
        assert_eq!(stats.variables, 5);
        assert_eq!(stats.demand_slots, 3);
        // vocal(6): >=1 and <=1 ; guitar(6): nothing ; vocal(13): >=1
        assert_eq!(stats.coverage_constraints, 3);
        // member 1 on day 6 holds two candidate roles
        assert_eq!(stats.uniqueness_constraints, 1);
        // member 1: 2 active days in one window, cap 1
        assert_eq!(stats.window_constraints, 1);
        assert!(!model.is_root_infeasible());
        assert!(!model.has_objective());
    }

    #[test]
    fn test_build_without_candidates_is_infeasible() {
        let members = vec![Member::new(1).with_role("vocal").with_max_shifts(3)];
        let demand = vec![demand(6, "vocal", 1, 1)];
        let blocked = vec![UnavailabilityRecord::new(1, d(6))];
        let availability = AvailabilityIndex::new(&blocked);
        let horizon = Horizon::new(d(1), d(31));
        let model = RosterCpBuilder::new(horizon, &members, &demand, &availability).build();

        assert_eq!(model.stats().variables, 0);
        assert_eq!(model.stats().uncoverable_slots, 1);
        assert!(model.is_root_infeasible());
    }

    #[test]
    fn test_optional_slot_without_candidates_is_fine() {
        let members = vec![Member::new(1).with_role("vocal").with_max_shifts(3)];
        let demand = vec![demand(6, "keys", 0, 2)];
        let availability = AvailabilityIndex::default();
        let horizon = Horizon::new(d(1), d(31));
        let model = RosterCpBuilder::new(horizon, &members, &demand, &availability).build();

        assert!(!model.is_root_infeasible());
        assert_eq!(model.stats().coverage_constraints, 0);
    }

    #[test]
    fn test_window_days_floor() {
        let members: Vec<Member> = Vec::new();
        let availability = AvailabilityIndex::default();
        let builder = RosterCpBuilder::new(Horizon::new(d(1), d(2)), &members, &[], &availability)
            .with_window_days(0);
        assert_eq!(builder.window_days, 1);
    }

    #[test]
    fn test_keys_align_with_vars() {
        let members = vec![Member::new(4).with_role("vocal").with_max_shifts(3)];
        let demand = vec![demand(2, "vocal", 0, 1), demand(3, "vocal", 0, 1)];
        let availability = AvailabilityIndex::default();
        let model = RosterCpBuilder::new(Horizon::new(d(1), d(5)), &members, &demand, &availability)
            .build();
        let keys: Vec<AssignmentKey> = model.space().keys().to_vec();
        assert_eq!(keys.len(), model.vars.len());
        assert_eq!(keys[0].day, 1);
        assert_eq!(keys[1].day, 2);
    }
}
