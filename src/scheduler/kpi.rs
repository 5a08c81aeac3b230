//! Roster quality metrics (KPIs).
//!
//! Computes fairness and fatigue indicators from a finished roster and
//! its inputs. Also usable as an independent checker of the hard rules.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Assignments per member | Total shifts over the horizon |
//! | Role spread | max − min shifts in a role, over members who could serve it |
//! | Consecutive pairs | Same member assigned on two adjacent dates |
//! | Peak window load | Most shifts of a member in any `window_days` span |
//! | Unmet minimum | Σ max(0, min_qty − headcount) over demand |
//! | Over maximum | Σ max(0, headcount − max_qty) over demand |

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{AvailabilityIndex, Member, MemberId, ResolvedDemand, Roster};

/// Roster performance indicators.
#[derive(Debug, Clone, Default)]
pub struct RosterKpi {
    /// Total assignments.
    pub total_assignments: usize,
    /// Assignments per member (members with none are listed with 0).
    pub assignments_by_member: BTreeMap<MemberId, usize>,
    /// max − min assignment count per role, over members eligible for the
    /// role and available on at least one of its demand dates.
    pub spread_by_role: BTreeMap<String, usize>,
    /// Pairs of assignments to one member on adjacent dates.
    pub consecutive_pairs: usize,
    /// Largest number of shifts of each member inside any rolling window.
    pub peak_window_load: BTreeMap<MemberId, usize>,
    /// Headcount missing below demand minimums.
    pub unmet_minimum: usize,
    /// Headcount above demand maximums.
    pub over_maximum: usize,
}

impl RosterKpi {
    /// Computes KPIs.
    ///
    /// # Arguments
    /// * `roster` - The extracted roster.
    /// * `members` - Members (for eligibility and zero-shift members).
    /// * `demand` - Resolved demand the roster was built for.
    /// * `availability` - Blocked days, to leave members who could never
    ///   serve a role out of its spread.
    /// * `window_days` - Rolling-window length. Zero yields no window load.
    pub fn calculate(
        roster: &Roster,
        members: &[Member],
        demand: &[ResolvedDemand],
        availability: &AvailabilityIndex,
        window_days: u32,
    ) -> Self {
        let mut assignments_by_member: BTreeMap<MemberId, usize> =
            members.iter().map(|m| (m.id, 0)).collect();
        let mut dates_by_member: BTreeMap<MemberId, BTreeSet<NaiveDate>> = BTreeMap::new();
        for a in roster.assignments() {
            *assignments_by_member.entry(a.member_id).or_insert(0) += 1;
            dates_by_member.entry(a.member_id).or_default().insert(a.date);
        }

        let mut spread_by_role = BTreeMap::new();
        let roles: BTreeSet<&str> = demand.iter().map(|r| r.role.as_str()).collect();
        for role in roles {
            let counts: Vec<usize> = members
                .iter()
                .filter(|m| {
                    m.can_serve(role)
                        && demand.iter().any(|r| {
                            r.role == role
                                && r.max_qty > 0
                                && !availability.is_blocked(m.id, r.date)
                        })
                })
                .map(|m| roster.count_for(m.id, role))
                .collect();
            if let (Some(max), Some(min)) = (counts.iter().max(), counts.iter().min()) {
                spread_by_role.insert(role.to_string(), max - min);
            }
        }

        let mut consecutive_pairs = 0;
        let mut peak_window_load = BTreeMap::new();
        for (&member_id, dates) in &dates_by_member {
            let dates: Vec<NaiveDate> = dates.iter().copied().collect();
            consecutive_pairs += dates
                .windows(2)
                .filter(|w| (w[1] - w[0]).num_days() == 1)
                .count();
            peak_window_load.insert(member_id, peak_load(&dates, window_days as i64));
        }
        for m in members {
            peak_window_load.entry(m.id).or_insert(0);
        }

        let mut unmet_minimum = 0;
        let mut over_maximum = 0;
        for r in demand {
            let headcount = roster.headcount(r.date, &r.role);
            unmet_minimum += (r.min_qty as usize).saturating_sub(headcount);
            over_maximum += headcount.saturating_sub(r.max_qty as usize);
        }

        Self {
            total_assignments: roster.len(),
            assignments_by_member,
            spread_by_role,
            consecutive_pairs,
            peak_window_load,
            unmet_minimum,
            over_maximum,
        }
    }

    /// Members whose peak window load exceeds their `max_shifts`.
    pub fn fatigue_violations(&self, members: &[Member]) -> Vec<MemberId> {
        members
            .iter()
            .filter(|m| {
                self.peak_window_load.get(&m.id).copied().unwrap_or(0) > m.max_shifts as usize
            })
            .map(|m| m.id)
            .collect()
    }

    /// Whether every demand row is within its bounds.
    pub fn covers_demand(&self) -> bool {
        self.unmet_minimum == 0 && self.over_maximum == 0
    }

    /// Sum of the per-role spreads.
    pub fn total_spread(&self) -> usize {
        self.spread_by_role.values().sum()
    }
}

/// Most dates inside any span of `window` consecutive days.
fn peak_load(sorted_dates: &[NaiveDate], window: i64) -> usize {
    if window <= 0 {
        return 0;
    }
    let mut best = 0;
    let mut lo = 0;
    for hi in 0..sorted_dates.len() {
        while (sorted_dates[hi] - sorted_dates[lo]).num_days() >= window {
            lo += 1;
        }
        best = best.max(hi - lo + 1);
    }
    best
}
