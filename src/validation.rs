//! Input validation for rostering problems.
//!
//! The solver core assumes validated input. This module gives the loading
//! layer one place to check structural integrity before handing data
//! over. Detects:
//! - Duplicate member IDs
//! - Quantity bounds with `min_qty > max_qty`
//! - Events referencing an undefined template
//! - Two events on the same date
//! - Duplicate overrides for one (date, role)
//! - Unavailability for an unknown member
//!
//! All problems are reported, not just the first.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use crate::models::{
    CustomDemandOverride, EventInstance, Member, MemberId, ServiceTemplate, UnavailabilityRecord,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// `min_qty` exceeds `max_qty`.
    InvalidQuantity,
    /// An event references a template that doesn't exist.
    UnknownTemplate,
    /// More than one event on the same date.
    DuplicateEventDate,
    /// More than one override for the same date and role.
    DuplicateOverride,
    /// Unavailability references a member that doesn't exist.
    UnknownMember,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input entities of one run.
///
/// Checks:
/// 1. No duplicate member IDs
/// 2. Template rows and overrides satisfy `min_qty <= max_qty`
/// 3. Every event references a defined template
/// 4. At most one event per date
/// 5. At most one override per (date, role)
/// 6. Every unavailability record names a known member
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    members: &[Member],
    unavailability: &[UnavailabilityRecord],
    templates: &[ServiceTemplate],
    events: &[EventInstance],
    overrides: &[CustomDemandOverride],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut member_ids: HashSet<MemberId> = HashSet::new();
    for m in members {
        if !member_ids.insert(m.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate member ID: {}", m.id),
            ));
        }
    }

    let mut template_ids = HashSet::new();
    for t in templates {
        template_ids.insert(t.template_id.as_str());
        if t.min_qty > t.max_qty {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidQuantity,
                format!(
                    "Template '{}' role '{}': min_qty {} > max_qty {}",
                    t.template_id, t.role, t.min_qty, t.max_qty
                ),
            ));
        }
    }

    let mut event_dates: HashMap<NaiveDate, &str> = HashMap::new();
    for e in events {
        if !template_ids.contains(e.template_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTemplate,
                format!(
                    "Event on {} calls for template '{}', which is not defined",
                    e.date, e.template_id
                ),
            ));
        }
        if let Some(previous) = event_dates.insert(e.date, e.template_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEventDate,
                format!(
                    "Date {} has more than one event ('{}' and '{}')",
                    e.date, previous, e.template_id
                ),
            ));
        }
    }

    let mut override_keys = HashSet::new();
    for o in overrides {
        if o.min_qty > o.max_qty {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidQuantity,
                format!(
                    "Override on {} role '{}': min_qty {} > max_qty {}",
                    o.date, o.role, o.min_qty, o.max_qty
                ),
            ));
        }
        if !override_keys.insert((o.date, o.role.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateOverride,
                format!("Duplicate override on {} for role '{}'", o.date, o.role),
            ));
        }
    }

    for u in unavailability {
        if !member_ids.contains(&u.member_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownMember,
                format!(
                    "Unavailability on {} references unknown member {}",
                    u.date, u.member_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
