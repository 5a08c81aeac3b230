//! Member model.
//!
//! Members are the volunteers being rostered. Each member carries the set
//! of roles they are competent for and a fatigue cap (`max_shifts`) that
//! bounds how many assignments they may receive inside any rolling window.
//!
//! Display names belong to the loading layer; the solver core only ever
//! looks at `id`, `roles` and `max_shifts`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Member identifier, assigned by the loading layer.
pub type MemberId = u32;

/// A volunteer who can be assigned to roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique member identifier.
    pub id: MemberId,
    /// Human-readable name (carried through, never interpreted).
    pub name: String,
    /// Roles this member is eligible for.
    pub roles: BTreeSet<String>,
    /// Maximum assignments inside any rolling window.
    pub max_shifts: u32,
}

impl Member {
    /// Creates a member with no roles and a zero fatigue cap.
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            name: String::new(),
            roles: BTreeSet::new(),
            max_shifts: 0,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an eligible role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Adds several eligible roles.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    /// Sets the fatigue cap.
    pub fn with_max_shifts(mut self, max_shifts: u32) -> Self {
        self.max_shifts = max_shifts;
        self
    }

    /// Whether this member may hold `role`.
    #[inline]
    pub fn can_serve(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_builder() {
        let m = Member::new(7)
            .with_name("Ana")
            .with_role("vocal")
            .with_roles(["guitar", "bass"])
            .with_max_shifts(4);

        assert_eq!(m.id, 7);
        assert_eq!(m.name, "Ana");
        assert_eq!(m.max_shifts, 4);
        assert_eq!(m.roles.len(), 3);
        assert!(m.can_serve("guitar"));
        assert!(!m.can_serve("drums"));
    }

    #[test]
    fn test_duplicate_roles_collapse() {
        let m = Member::new(1).with_roles(["vocal", "vocal"]);
        assert_eq!(m.roles.len(), 1);
    }
}
