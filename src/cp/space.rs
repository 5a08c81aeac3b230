//! Sparse decision-variable space.
//!
//! A variable `x[member, day, role]` exists iff
//! - the member is eligible for the role,
//! - `(day, role)` carries resolved demand inside the horizon,
//! - the member is not blocked on that day.
//!
//! Ineligible or unavailable combinations are never materialised, so no
//! constraint can ever assign them. The space is computed without touching
//! the solver; [`super::RosterCpBuilder`] later allocates one 0/1 domain
//! per key in the same order.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{AvailabilityIndex, Horizon, Member, MemberId, ResolvedDemand};

/// Identifies one decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssignmentKey {
    /// Member.
    pub member_id: MemberId,
    /// Day offset inside the horizon.
    pub day: usize,
    /// Index into [`VariableSpace::roles`].
    pub role: usize,
}

/// Demand restricted to the horizon, in day-offset / role-index form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemandSlot {
    /// Day offset.
    pub day: usize,
    /// Role index.
    pub role: usize,
    /// Minimum headcount.
    pub min_qty: u32,
    /// Maximum headcount.
    pub max_qty: u32,
}

/// The variable keys of one solve, with the groupings every constraint
/// family needs.
#[derive(Debug, Clone)]
pub struct VariableSpace {
    horizon: Horizon,
    roles: Vec<String>,
    keys: Vec<AssignmentKey>,
    slots: Vec<DemandSlot>,
    by_member_day: BTreeMap<(MemberId, usize), Vec<usize>>,
    by_day_role: BTreeMap<(usize, usize), Vec<usize>>,
    by_member_role: BTreeMap<(MemberId, usize), Vec<usize>>,
    out_of_horizon: usize,
}

impl VariableSpace {
    /// Computes the variable space.
    ///
    /// Demand dated outside the horizon is ignored and counted in
    /// [`Self::out_of_horizon`].
    pub fn new(
        horizon: &Horizon,
        members: &[Member],
        demand: &[ResolvedDemand],
        availability: &AvailabilityIndex,
    ) -> Self {
        let mut role_index: BTreeMap<&str, usize> = BTreeMap::new();
        for r in demand {
            role_index.entry(r.role.as_str()).or_insert(0);
        }
        let roles: Vec<String> = role_index.keys().map(|r| r.to_string()).collect();
        for (idx, slot) in role_index.values_mut().enumerate() {
            *slot = idx;
        }

        let mut out_of_horizon = 0;
        let mut slots = Vec::with_capacity(demand.len());
        for r in demand {
            if r.max_qty == 0 {
                continue;
            }
            let Some(day) = horizon.offset_of(r.date) else {
                out_of_horizon += 1;
                continue;
            };
            slots.push(DemandSlot {
                day,
                role: role_index[r.role.as_str()],
                min_qty: r.min_qty,
                max_qty: r.max_qty,
            });
        }
        slots.sort_by_key(|s| (s.day, s.role));
        slots.dedup_by_key(|s| (s.day, s.role));

        let mut ordered: Vec<&Member> = members.iter().collect();
        ordered.sort_by_key(|m| m.id);

        let mut keys = Vec::new();
        for slot in &slots {
            let role = roles[slot.role].as_str();
            let date = horizon.date_at(slot.day);
            for member in &ordered {
                if member.can_serve(role) && !availability.is_blocked(member.id, date) {
                    keys.push(AssignmentKey {
                        member_id: member.id,
                        day: slot.day,
                        role: slot.role,
                    });
                }
            }
        }

        let mut by_member_day: BTreeMap<(MemberId, usize), Vec<usize>> = BTreeMap::new();
        let mut by_day_role: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        let mut by_member_role: BTreeMap<(MemberId, usize), Vec<usize>> = BTreeMap::new();
        for (idx, k) in keys.iter().enumerate() {
            by_member_day.entry((k.member_id, k.day)).or_default().push(idx);
            by_day_role.entry((k.day, k.role)).or_default().push(idx);
            by_member_role.entry((k.member_id, k.role)).or_default().push(idx);
        }

        Self {
            horizon: *horizon,
            roles,
            keys,
            slots,
            by_member_day,
            by_day_role,
            by_member_role,
            out_of_horizon,
        }
    }

    /// The horizon the day offsets refer to.
    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    /// Role names, indexed by [`AssignmentKey::role`].
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// All variable keys, in allocation order.
    pub fn keys(&self) -> &[AssignmentKey] {
        &self.keys
    }

    /// Number of decision variables.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no variable exists.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Demand slots inside the horizon, ordered by day then role.
    pub fn slots(&self) -> &[DemandSlot] {
        &self.slots
    }

    /// Demand rows dropped because their date is outside the horizon.
    pub fn out_of_horizon(&self) -> usize {
        self.out_of_horizon
    }

    /// Variables covering one (day, role).
    pub fn for_slot(&self, day: usize, role: usize) -> &[usize] {
        self.by_day_role
            .get(&(day, role))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// (member, day) groups with their variables.
    pub fn member_days(&self) -> impl Iterator<Item = (MemberId, usize, &[usize])> + '_ {
        self.by_member_day
            .iter()
            .map(|(&(m, day), vars)| (m, day, vars.as_slice()))
    }

    /// Variables of one member on one day.
    pub fn for_member_day(&self, member_id: MemberId, day: usize) -> &[usize] {
        self.by_member_day
            .get(&(member_id, day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Days (ascending) on which the member has at least one variable.
    pub fn active_days(&self, member_id: MemberId) -> Vec<usize> {
        self.by_member_day
            .range((member_id, 0)..=(member_id, usize::MAX))
            .map(|(&(_, day), _)| day)
            .collect()
    }

    /// (member, role) groups with their variables.
    pub fn member_roles(&self) -> impl Iterator<Item = (MemberId, usize, &[usize])> + '_ {
        self.by_member_role
            .iter()
            .map(|(&(m, role), vars)| (m, role, vars.as_slice()))
    }

    /// Translates a key back into domain terms.
    pub fn describe(&self, key: &AssignmentKey) -> (MemberId, NaiveDate, &str) {
        (
            key.member_id,
            self.horizon.date_at(key.day),
            self.roles[key.role].as_str(),
        )
    }
}
