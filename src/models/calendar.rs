//! Planning horizon and member availability.
//!
//! # Time Model
//! The roster works at calendar-day granularity. A [`Horizon`] is an
//! inclusive `[start, end]` range of `chrono::NaiveDate`s; every date inside
//! it has a dense day offset (`0..len_days()`), which the constraint model
//! uses to index rolling windows and adjacent-day pairs.
//!
//! # Availability
//! Unavailability is purely negative: a member is available on every date
//! unless an [`UnavailabilityRecord`] blocks it. [`AvailabilityIndex`]
//! answers that question in O(1).

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::MemberId;

/// Inclusive range of calendar days covered by one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// First scheduled day (inclusive).
    pub start: NaiveDate,
    /// Last scheduled day (inclusive).
    pub end: NaiveDate,
}

impl Horizon {
    /// Creates a horizon. `end < start` yields an empty horizon.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days in the horizon (0 if empty).
    pub fn len_days(&self) -> usize {
        let span = (self.end - self.start).num_days();
        if span < 0 {
            0
        } else {
            span as usize + 1
        }
    }

    /// Whether the horizon has no days.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `date` lies inside the horizon.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Day offset of `date` from `start`, if inside the horizon.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        if self.contains(date) {
            Some((date - self.start).num_days() as usize)
        } else {
            None
        }
    }

    /// Date at a given day offset.
    pub fn date_at(&self, offset: usize) -> NaiveDate {
        self.start + Duration::days(offset as i64)
    }

    /// Iterates every day of the horizon in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.len_days()).map(move |offset| self.date_at(offset))
    }
}

/// A single day on which a member cannot serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnavailabilityRecord {
    /// Blocked member.
    pub member_id: MemberId,
    /// Blocked day.
    pub date: NaiveDate,
}

impl UnavailabilityRecord {
    /// Creates a new record.
    pub fn new(member_id: MemberId, date: NaiveDate) -> Self {
        Self { member_id, date }
    }
}

/// Constant-time lookup of blocked (member, date) pairs.
///
/// Built once from the unavailability records and never mutated.
/// Duplicate records are harmless.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityIndex {
    blocked: HashSet<(MemberId, NaiveDate)>,
}

impl AvailabilityIndex {
    /// Builds the index from unavailability records.
    pub fn new<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a UnavailabilityRecord>,
    {
        Self {
            blocked: records
                .into_iter()
                .map(|r| (r.member_id, r.date))
                .collect(),
        }
    }

    /// Whether `member_id` is forbidden on `date`.
    #[inline]
    pub fn is_blocked(&self, member_id: MemberId, date: NaiveDate) -> bool {
        self.blocked.contains(&(member_id, date))
    }

    /// Number of distinct blocked pairs.
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Whether nothing is blocked.
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}
