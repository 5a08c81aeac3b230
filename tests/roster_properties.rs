use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roster_cp::config::{ObjectiveWeights, SchedulerConfig, SolveBudget};
use roster_cp::cp::SolveStatus;
use roster_cp::models::{
    AvailabilityIndex, CustomDemandOverride, EventInstance, Member, Roster, ServiceTemplate,
    UnavailabilityRecord,
};
use roster_cp::scheduler::{RosterInput, RosterKpi, RosterOutcome, RosterScheduler};
use std::collections::HashSet;

const ROLES: [&str; 3] = ["vocal", "guitar", "drums"];

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, day).unwrap()
}

fn random_input(seed: u64, start: NaiveDate, days: i64) -> RosterInput {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut input = RosterInput::new();

    for id in 0..8u32 {
        let primary = ROLES[id as usize % ROLES.len()];
        let extra = ROLES[rng.random_range(0..ROLES.len())];
        input = input.with_member(
            Member::new(id)
                .with_roles([primary, extra])
                .with_max_shifts(rng.random_range(4..=7)),
        );
    }

    for role in ROLES {
        input = input.with_template(ServiceTemplate::new("weekend", role, 1, 2));
    }

    for offset in 0..days {
        let date = start + Duration::days(offset);
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            input = input.with_event(EventInstance::new(date, "weekend"));
        }
        for id in 0..8u32 {
            if rng.random_bool(0.08) {
                input = input.with_unavailability(UnavailabilityRecord::new(id, date));
            }
        }
    }
    input
}

fn assert_hard_rules(input: &RosterInput, outcome: &RosterOutcome, window_days: i64) {
    let roster: &Roster = outcome.roster.as_ref().expect("solved outcome has a roster");
    let blocked: HashSet<(u32, NaiveDate)> =
        input.unavailability.iter().map(|u| (u.member_id, u.date)).collect();

    let mut member_days = HashSet::new();
    for a in roster.assignments() {
        let member = input.members.iter().find(|m| m.id == a.member_id).unwrap();
        assert!(member.can_serve(&a.role), "ineligible assignment {a:?}");
        assert!(!blocked.contains(&(a.member_id, a.date)), "blocked assignment {a:?}");
        assert!(member_days.insert((a.member_id, a.date)), "two roles on one day {a:?}");
    }

    for r in &outcome.demand {
        let headcount = roster.headcount(r.date, &r.role) as u32;
        assert!(headcount >= r.min_qty && headcount <= r.max_qty, "coverage {r:?}");
    }

    // Every window start, not only month starts.
    for member in &input.members {
        let dates: Vec<NaiveDate> = roster
            .assignments_for_member(member.id)
            .iter()
            .map(|a| a.date)
            .collect();
        for &first in &dates {
            let inside = dates
                .iter()
                .filter(|&&x| x >= first && (x - first).num_days() < window_days)
                .count();
            assert!(
                inside as u32 <= member.max_shifts,
                "member {} has {} shifts in the window starting {}",
                member.id,
                inside,
                first
            );
        }
    }

    let availability = AvailabilityIndex::new(&input.unavailability);
    let kpi = RosterKpi::calculate(
        roster,
        &input.members,
        &outcome.demand,
        &availability,
        window_days as u32,
    );
    assert!(kpi.covers_demand());
    assert!(kpi.fatigue_violations(&input.members).is_empty());
}

#[test]
fn test_random_instances_respect_hard_rules() {
    let start = d(1, 1);
    let mut solved = 0;
    for seed in 0..5 {
        let input = random_input(seed, start, 62);
        let config = SchedulerConfig::new(start, start + Duration::days(61))
            .with_budget(SolveBudget::time_limit(std::time::Duration::from_secs(5)));
        let outcome = RosterScheduler::new(config).run(&input).unwrap();

        match outcome.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {
                solved += 1;
                assert_hard_rules(&input, &outcome, 31);
            }
            SolveStatus::Infeasible | SolveStatus::Unknown => assert!(outcome.roster.is_none()),
        }
    }
    assert!(solved > 0);
}

#[test]
fn test_rolling_window_spans_month_boundary() {
    // Four shifts within eight days straddling January/February: a calendar
    // month tally sees two per month, the rolling window sees four.
    let input = RosterInput::new()
        .with_member(Member::new(1).with_role("vocal").with_max_shifts(3))
        .with_override(CustomDemandOverride::new(d(1, 28), "vocal", 1, 1))
        .with_override(CustomDemandOverride::new(d(1, 30), "vocal", 1, 1))
        .with_override(CustomDemandOverride::new(d(2, 2), "vocal", 1, 1))
        .with_override(CustomDemandOverride::new(d(2, 4), "vocal", 1, 1));
    let config = SchedulerConfig::new(d(1, 1), d(2, 28));

    let outcome = RosterScheduler::new(config.clone()).run(&input).unwrap();
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.roster.is_none());

    let mut relaxed = input.clone();
    relaxed.members[0].max_shifts = 4;
    let outcome = RosterScheduler::new(config).run(&relaxed).unwrap();
    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.roster.unwrap().len(), 4);
}

#[test]
fn test_min_above_eligible_members_is_infeasible() {
    let mut input = RosterInput::new()
        .with_member(Member::new(1).with_role("vocal").with_max_shifts(10))
        .with_member(Member::new(2).with_role("vocal").with_max_shifts(10))
        .with_member(Member::new(3).with_role("drums").with_max_shifts(10))
        .with_template(ServiceTemplate::new("sunday", "vocal", 3, 3));
    for day in [2, 9, 16, 23] {
        input = input.with_event(EventInstance::new(d(3, day), "sunday"));
    }

    let outcome = RosterScheduler::new(SchedulerConfig::new(d(3, 1), d(3, 31)))
        .run(&input)
        .unwrap();
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.roster.is_none());
}

#[test]
fn test_unavailability_can_force_infeasibility() {
    let input = RosterInput::new()
        .with_member(Member::new(1).with_role("vocal").with_max_shifts(10))
        .with_unavailability(UnavailabilityRecord::new(1, d(3, 2)))
        .with_template(ServiceTemplate::new("sunday", "vocal", 1, 1))
        .with_event(EventInstance::new(d(3, 2), "sunday"));

    let outcome = RosterScheduler::new(SchedulerConfig::new(d(3, 1), d(3, 31)))
        .run(&input)
        .unwrap();
    assert_eq!(outcome.status, SolveStatus::Infeasible);
}

#[test]
fn test_equity_and_weekend_spreading() {
    // Sat 1, Sun 2, Sat 8, Sun 9 March 2025.
    let mut input = RosterInput::new()
        .with_member(Member::new(1).with_role("vocal").with_max_shifts(10))
        .with_member(Member::new(2).with_role("vocal").with_max_shifts(10))
        .with_template(ServiceTemplate::new("weekend", "vocal", 1, 1));
    for day in [1, 2, 8, 9] {
        input = input.with_event(EventInstance::new(d(3, day), "weekend"));
    }

    let outcome = RosterScheduler::new(SchedulerConfig::new(d(3, 1), d(3, 31)))
        .run(&input)
        .unwrap();
    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.objective, Some(0));

    let roster = outcome.roster.unwrap();
    let open = AvailabilityIndex::default();
    let kpi = RosterKpi::calculate(&roster, &input.members, &outcome.demand, &open, 31);
    assert_eq!(kpi.assignments_by_member[&1], 2);
    assert_eq!(kpi.assignments_by_member[&2], 2);
    assert_eq!(kpi.consecutive_pairs, 0);
}

#[test]
fn test_equity_outranks_back_to_back_penalty() {
    // Two members, two adjacent days. Splitting costs nothing; giving both
    // days to one member costs spread 2 and one pair.
    let input = RosterInput::new()
        .with_member(Member::new(1).with_role("vocal").with_max_shifts(10))
        .with_member(Member::new(2).with_roles(["vocal", "drums"]).with_max_shifts(10))
        .with_override(CustomDemandOverride::new(d(5, 3), "vocal", 1, 1))
        .with_override(CustomDemandOverride::new(d(5, 4), "vocal", 1, 1));
    let config = SchedulerConfig::new(d(5, 1), d(5, 31)).with_weights(ObjectiveWeights::new(10, 1));

    let outcome = RosterScheduler::new(config).run(&input).unwrap();
    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.objective, Some(0));
    let roster = outcome.roster.unwrap();
    assert_eq!(roster.assignments_for_member(1).len(), 1);
    assert_eq!(roster.assignments_for_member(2).len(), 1);
}

/// Twelve singers. Member 0 owns two non-adjacent required days; every
/// other member owns one required day followed by an optional one. Leaving
/// the optional days empty avoids eleven back-to-back pairs but leaves
/// member 0 one shift ahead of everyone else.
fn pinned_singers() -> RosterInput {
    let day = |offset: u32| d(3, 1) + Duration::days(offset as i64);
    let mut slots: Vec<(u32, u32, u32)> = vec![(0, 0, 1), (0, 2, 1)];
    for member in 1..12u32 {
        let forced = 3 * member + 2;
        slots.push((member, forced, 1));
        slots.push((member, forced + 1, 0));
    }

    let mut input = RosterInput::new();
    for id in 0..12u32 {
        input = input.with_member(Member::new(id).with_role("vocal").with_max_shifts(10));
    }
    for (owner, offset, min_qty) in slots {
        input = input.with_override(CustomDemandOverride::new(day(offset), "vocal", min_qty, 1));
        for other in (0..12u32).filter(|&m| m != owner) {
            input = input.with_unavailability(UnavailabilityRecord::new(other, day(offset)));
        }
    }
    input
}

#[test]
fn test_equity_is_never_traded_for_fewer_pairs() {
    let input = pinned_singers();
    let outcome = RosterScheduler::new(SchedulerConfig::new(d(3, 1), d(4, 30)))
        .run(&input)
        .unwrap();

    assert_eq!(outcome.status, SolveStatus::Optimal);
    assert_eq!(outcome.stats.consecutive_pairs, 11);
    assert_eq!(outcome.stats.equity_coefficient, 10 * 12);
    // Spread 0 with eleven pairs beats spread 1 with none.
    assert_eq!(outcome.objective, Some(11));

    let roster = outcome.roster.unwrap();
    let availability = AvailabilityIndex::new(&input.unavailability);
    let kpi = RosterKpi::calculate(&roster, &input.members, &outcome.demand, &availability, 31);
    assert_eq!(kpi.spread_by_role["vocal"], 0);
    assert_eq!(kpi.consecutive_pairs, 11);
    assert!(kpi.assignments_by_member.values().all(|&n| n == 2));
}

#[test]
fn test_first_solution_budget_reports_feasible() {
    let start = d(1, 1);
    let input = random_input(7, start, 31);
    let config = SchedulerConfig::new(start, start + Duration::days(30))
        .with_budget(SolveBudget::solutions(1));
    let outcome = RosterScheduler::new(config).run(&input).unwrap();

    // Infeasibility is proven before any roster exists, so the limit never fires.
    if outcome.status == SolveStatus::Infeasible {
        assert!(!outcome.budget_exhausted);
        return;
    }
    assert_eq!(outcome.status, SolveStatus::Feasible);
    assert!(outcome.budget_exhausted);
    assert!(outcome.objective.is_some());
    assert_hard_rules(&input, &outcome, 31);
}

#[test]
fn test_zero_iteration_budget_reports_unknown() {
    let start = d(1, 1);
    let input = random_input(7, start, 31);
    let config = SchedulerConfig::new(start, start + Duration::days(30))
        .with_budget(SolveBudget::iterations(0));
    let outcome = RosterScheduler::new(config).run(&input).unwrap();

    if outcome.status == SolveStatus::Infeasible {
        return;
    }
    assert_eq!(outcome.status, SolveStatus::Unknown);
    assert!(outcome.budget_exhausted);
    assert!(outcome.roster.is_none());
    assert_eq!(outcome.objective, None);
}

#[test]
fn test_outcome_kind_is_deterministic() {
    let start = d(1, 1);
    let input = random_input(42, start, 31);
    let config = SchedulerConfig::new(start, start + Duration::days(30));

    let first = RosterScheduler::new(config.clone()).run(&input).unwrap();
    let second = RosterScheduler::new(config).run(&input).unwrap();

    assert_eq!(first.status, second.status);
    if first.status == SolveStatus::Optimal {
        assert_eq!(first.objective, second.objective);
    }
}

#[test]
fn test_override_adds_role_end_to_end() {
    let input = RosterInput::new()
        .with_member(Member::new(1).with_role("vocal").with_max_shifts(5))
        .with_member(Member::new(2).with_role("bass").with_max_shifts(5))
        .with_template(ServiceTemplate::new("sunday", "vocal", 1, 1))
        .with_event(EventInstance::new(d(4, 6), "sunday"))
        .with_override(CustomDemandOverride::new(d(4, 6), "bass", 1, 1));

    let outcome = RosterScheduler::new(SchedulerConfig::new(d(4, 1), d(4, 30)))
        .run(&input)
        .unwrap();
    let roster = outcome.roster.unwrap();
    assert!(roster.contains(2, d(4, 6), "bass"));
    assert!(roster.contains(1, d(4, 6), "vocal"));
}
