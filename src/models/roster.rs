//! Roster (solution) model.
//!
//! A roster is the set of `(member, date, role)` triples whose decision
//! variable is true in the assignment returned by the solver. It is
//! immutable once extracted and kept sorted by `(date, role, member)` so
//! that two extractions of the same assignment compare equal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MemberId;

/// One member serving one role on one date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned date.
    pub date: NaiveDate,
    /// Assigned role.
    pub role: String,
    /// Assigned member.
    pub member_id: MemberId,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(member_id: MemberId, date: NaiveDate, role: impl Into<String>) -> Self {
        Self {
            date,
            role: role.into(),
            member_id,
        }
    }
}

/// A complete roster for one horizon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    assignments: Vec<Assignment>,
}

impl Roster {
    /// Builds a roster, sorting and de-duplicating the triples.
    pub fn from_assignments(mut assignments: Vec<Assignment>) -> Self {
        assignments.sort();
        assignments.dedup();
        Self { assignments }
    }

    /// All assignments, ordered by date, role, member.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Whether the given triple is part of the roster.
    pub fn contains(&self, member_id: MemberId, date: NaiveDate, role: &str) -> bool {
        self.assignments
            .iter()
            .any(|a| a.member_id == member_id && a.date == date && a.role == role)
    }

    /// Assignments of one member, in date order.
    pub fn assignments_for_member(&self, member_id: MemberId) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.member_id == member_id)
            .collect()
    }

    /// Assignments on one date.
    pub fn on_date(&self, date: NaiveDate) -> Vec<&Assignment> {
        self.assignments.iter().filter(|a| a.date == date).collect()
    }

    /// Headcount for a (date, role).
    pub fn headcount(&self, date: NaiveDate, role: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.date == date && a.role == role)
            .count()
    }

    /// Number of times `member_id` holds `role` over the horizon.
    pub fn count_for(&self, member_id: MemberId, role: &str) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.member_id == member_id && a.role == role)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn sample_roster() -> Roster {
        Roster::from_assignments(vec![
            Assignment::new(2, d(8), "vocal"),
            Assignment::new(1, d(1), "vocal"),
            Assignment::new(3, d(1), "drums"),
            Assignment::new(1, d(8), "guitar"),
            Assignment::new(1, d(1), "vocal"),
        ])
    }

    #[test]
    fn test_roster_sorted_and_deduped() {
        let r = sample_roster();
        assert_eq!(r.len(), 4);
        let dates: Vec<_> = r.assignments().iter().map(|a| (a.date, a.role.as_str())).collect();
        assert_eq!(
            dates,
            vec![(d(1), "drums"), (d(1), "vocal"), (d(8), "guitar"), (d(8), "vocal")]
        );
    }

    #[test]
    fn test_roster_queries() {
        let r = sample_roster();
        assert!(r.contains(1, d(1), "vocal"));
        assert!(!r.contains(1, d(1), "drums"));
        assert_eq!(r.assignments_for_member(1).len(), 2);
        assert_eq!(r.on_date(d(1)).len(), 2);
        assert_eq!(r.headcount(d(8), "vocal"), 1);
        assert_eq!(r.count_for(1, "vocal"), 1);
        assert_eq!(r.count_for(4, "vocal"), 0);
    }

    #[test]
    fn test_roster_serde() {
        let r = sample_roster();
        let json = serde_json::to_string(&r).unwrap();
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
