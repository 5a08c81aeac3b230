//! Rostering domain models.
//!
//! Value objects handed over by the loading layer (already validated and
//! keyed by identifier) plus the solution type produced by a solve.
//!
//! # Domain Mappings
//!
//! | roster-cp | Worship team | Hospital | Event staffing |
//! |-----------|--------------|----------|----------------|
//! | Member | Musician | Nurse | Steward |
//! | Role | Vocal/Drums | Ward | Gate/Bar |
//! | ServiceTemplate | Sunday service | Night shift | Match day |
//! | Roster | Team schedule | Ward rota | Staff plan |

mod calendar;
mod demand;
mod member;
mod roster;

pub use calendar::{AvailabilityIndex, Horizon, UnavailabilityRecord};
pub use demand::{
    CustomDemandOverride, DemandSource, EventInstance, ResolvedDemand, ServiceTemplate,
};
pub use member::{Member, MemberId};
pub use roster::{Assignment, Roster};
