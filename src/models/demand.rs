//! Staffing demand models.
//!
//! Demand comes from two places:
//! - **Templates**: a generic per-event-type list of `(role, min, max)` rows,
//!   instantiated on every date that carries an [`EventInstance`].
//! - **Overrides**: date-specific [`CustomDemandOverride`] rows that replace,
//!   add, or suppress (`max_qty = 0`) a role on one date.
//!
//! The merge of the two is a [`ResolvedDemand`], see [`crate::demand`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One role requirement of an event template.
///
/// Several rows share a `template_id`; together they describe one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTemplate {
    /// Template (event type) identifier.
    pub template_id: String,
    /// Required role.
    pub role: String,
    /// Minimum headcount.
    pub min_qty: u32,
    /// Maximum headcount.
    pub max_qty: u32,
}

impl ServiceTemplate {
    /// Creates a template row.
    pub fn new(
        template_id: impl Into<String>,
        role: impl Into<String>,
        min_qty: u32,
        max_qty: u32,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            role: role.into(),
            min_qty,
            max_qty,
        }
    }
}

/// A calendar day that needs staffing according to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInstance {
    /// Event date.
    pub date: NaiveDate,
    /// Template applied on that date.
    pub template_id: String,
}

impl EventInstance {
    /// Creates an event.
    pub fn new(date: NaiveDate, template_id: impl Into<String>) -> Self {
        Self {
            date,
            template_id: template_id.into(),
        }
    }
}

/// A date-specific requirement that takes precedence over templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDemandOverride {
    /// Affected date.
    pub date: NaiveDate,
    /// Affected role.
    pub role: String,
    /// Minimum headcount.
    pub min_qty: u32,
    /// Maximum headcount. Zero suppresses the role on that date.
    pub max_qty: u32,
}

impl CustomDemandOverride {
    /// Creates an override.
    pub fn new(date: NaiveDate, role: impl Into<String>, min_qty: u32, max_qty: u32) -> Self {
        Self {
            date,
            role: role.into(),
            min_qty,
            max_qty,
        }
    }

    /// Creates an override that removes `role` from `date`.
    pub fn suppress(date: NaiveDate, role: impl Into<String>) -> Self {
        Self::new(date, role, 0, 0)
    }

    /// Whether this override removes the role.
    #[inline]
    pub fn is_suppression(&self) -> bool {
        self.max_qty == 0
    }
}

/// Where a resolved requirement came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemandSource {
    /// Instantiated from the named template, untouched by overrides.
    Template(String),
    /// Set (replaced or added) by a custom override.
    Override,
}

/// Final staffing requirement for one (date, role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDemand {
    /// Date.
    pub date: NaiveDate,
    /// Role.
    pub role: String,
    /// Minimum headcount.
    pub min_qty: u32,
    /// Maximum headcount (always > 0 for resolved demand).
    pub max_qty: u32,
    /// Provenance.
    pub source: DemandSource,
}

impl ResolvedDemand {
    /// Whether the requirement came from an override.
    pub fn is_override(&self) -> bool {
        self.source == DemandSource::Override
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_suppression() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        assert!(CustomDemandOverride::suppress(date, "drums").is_suppression());
        assert!(!CustomDemandOverride::new(date, "drums", 0, 1).is_suppression());
    }

    #[test]
    fn test_template_serde() {
        let t = ServiceTemplate::new("sunday", "vocal", 1, 3);
        let json = serde_json::to_string(&t).unwrap();
        let back: ServiceTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
