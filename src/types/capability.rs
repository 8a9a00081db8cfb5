use std::fmt;

/// Capability is the bitmask of operations a principal may perform on one
/// resource instance. It is computed per request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capability(u8);

impl Capability {
    pub const NONE: Capability = Capability(0);
    pub const GET: Capability = Capability(1 << 0); // 1
    pub const SET: Capability = Capability(1 << 1); // 2
    pub const CREATE: Capability = Capability(1 << 2); // 4
    pub const DELETE: Capability = Capability(1 << 3); // 8
    pub const ALL: Capability = Capability(0b1111);

    /// Returns true if this mask contains every bit of `required`.
    #[must_use]
    pub const fn has(self, required: Capability) -> bool {
        self.0 & required.0 == required.0
    }

    #[must_use]
    pub const fn union(self, other: Capability) -> Capability {
        Capability(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Capability) -> Capability {
        Capability(self.0 & other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Capabilities a user holds on a project, derived from the `owns` and
    /// `views` relations.
    #[must_use]
    pub const fn for_project(owns: bool, views: bool) -> Capability {
        if owns {
            Capability(Self::GET.0 | Self::SET.0 | Self::DELETE.0)
        } else if views {
            Capability(Self::GET.0 | Self::DELETE.0)
        } else {
            Self::NONE
        }
    }

    #[must_use]
    pub fn to_strings(self) -> Vec<&'static str> {
        let mut caps = Vec::new();
        if self.has(Self::GET) {
            caps.push("get");
        }
        if self.has(Self::SET) {
            caps.push("set");
        }
        if self.has(Self::CREATE) {
            caps.push("create");
        }
        if self.has(Self::DELETE) {
            caps.push("delete");
        }
        caps
    }
}

impl std::ops::BitOr for Capability {
    type Output = Capability;

    fn bitor(self, rhs: Capability) -> Capability {
        self.union(rhs)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.to_strings().join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_has() {
        let c = Capability::GET | Capability::SET;
        assert!(c.has(Capability::GET));
        assert!(c.has(Capability::SET));
        assert!(!c.has(Capability::CREATE));
        assert!(!c.has(Capability::GET | Capability::DELETE));
    }

    #[test]
    fn test_for_project() {
        let owner = Capability::for_project(true, false);
        assert_eq!(owner, Capability::GET | Capability::SET | Capability::DELETE);

        let viewer = Capability::for_project(false, true);
        assert_eq!(viewer, Capability::GET | Capability::DELETE);

        assert!(Capability::for_project(false, false).is_empty());
        // Owning dominates viewing.
        assert_eq!(Capability::for_project(true, true), owner);
    }

    #[test]
    fn test_set_implies_get_and_delete_follows_get() {
        for (owns, views) in [(false, false), (false, true), (true, false), (true, true)] {
            let c = Capability::for_project(owns, views);
            assert_eq!(c.has(Capability::SET), owns);
            assert_eq!(c.has(Capability::GET), owns || views);
            assert_eq!(c.has(Capability::DELETE), c.has(Capability::GET));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!((Capability::GET | Capability::CREATE).to_string(), "get|create");
        assert_eq!(Capability::NONE.to_string(), "none");
    }
}
