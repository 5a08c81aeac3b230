//! Demand resolution: templates merged with date-specific overrides.
//!
//! # Algorithm
//!
//! 1. Events are visited in date order. Each event expands its template
//!    into a per-date map `role → (min_qty, max_qty)`.
//! 2. Overrides are applied on top, in input order:
//!    - role already present → its bounds are **replaced**,
//!    - role absent → it is **added**,
//!    - `max_qty = 0` → the role is **removed** from that date.
//! 3. Dates that only appear in overrides still produce demand.
//! 4. Anything left with `max_qty = 0` (e.g. a `0/0` template row) is
//!    dropped: it would create no variables and no coverage constraint.
//!
//! Output is one [`ResolvedDemand`] per surviving (date, role), ordered
//! by date then role.
//!
//! # Complexity
//! O((E·R + O) log(E·R)) for E events, R rows per template, O overrides.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{
    CustomDemandOverride, DemandSource, EventInstance, ResolvedDemand, ServiceTemplate,
};

type DayDemand = BTreeMap<String, (u32, u32, DemandSource)>;

/// Merges template demand with custom overrides.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use roster_cp::demand::DemandResolver;
/// use roster_cp::models::{CustomDemandOverride, EventInstance, ServiceTemplate};
///
/// let sunday = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
/// let templates = vec![
///     ServiceTemplate::new("service", "vocal", 1, 2),
///     ServiceTemplate::new("service", "drums", 1, 1),
/// ];
/// let events = vec![EventInstance::new(sunday, "service")];
/// let overrides = vec![CustomDemandOverride::suppress(sunday, "drums")];
///
/// let demand = DemandResolver::new(&templates).resolve(&events, &overrides);
/// assert_eq!(demand.len(), 1);
/// assert_eq!(demand[0].role, "vocal");
/// ```
#[derive(Debug, Clone)]
pub struct DemandResolver<'a> {
    templates: BTreeMap<&'a str, Vec<&'a ServiceTemplate>>,
}

impl<'a> DemandResolver<'a> {
    /// Creates a resolver over the given template rows.
    pub fn new(templates: &'a [ServiceTemplate]) -> Self {
        let mut grouped: BTreeMap<&'a str, Vec<&'a ServiceTemplate>> = BTreeMap::new();
        for row in templates {
            grouped.entry(row.template_id.as_str()).or_default().push(row);
        }
        Self { templates: grouped }
    }

    /// Number of distinct templates.
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Produces the authoritative per-(date, role) requirement list.
    pub fn resolve(
        &self,
        events: &[EventInstance],
        overrides: &[CustomDemandOverride],
    ) -> Vec<ResolvedDemand> {
        let mut days: BTreeMap<NaiveDate, DayDemand> = BTreeMap::new();

        let mut ordered: Vec<&EventInstance> = events.iter().collect();
        ordered.sort_by_key(|e| e.date);

        for event in ordered {
            let Some(rows) = self.templates.get(event.template_id.as_str()) else {
                tracing::warn!(
                    date = %event.date,
                    template = %event.template_id,
                    "event references an unknown template; no demand generated"
                );
                continue;
            };
            let day = days.entry(event.date).or_default();
            for row in rows {
                day.insert(
                    row.role.clone(),
                    (
                        row.min_qty,
                        row.max_qty,
                        DemandSource::Template(row.template_id.clone()),
                    ),
                );
            }
        }

        for o in overrides {
            let day = days.entry(o.date).or_default();
            if o.is_suppression() {
                day.remove(&o.role);
            } else {
                day.insert(o.role.clone(), (o.min_qty, o.max_qty, DemandSource::Override));
            }
        }

        let resolved: Vec<ResolvedDemand> = days
            .into_iter()
            .flat_map(|(date, roles)| {
                roles
                    .into_iter()
                    .filter(|(_, (_, max_qty, _))| *max_qty > 0)
                    .map(move |(role, (min_qty, max_qty, source))| ResolvedDemand {
                        date,
                        role,
                        min_qty,
                        max_qty,
                        source,
                    })
            })
            .collect();

        tracing::debug!(
            events = events.len(),
            overrides = overrides.len(),
            resolved = resolved.len(),
            "demand resolved"
        );
        resolved
    }
}
