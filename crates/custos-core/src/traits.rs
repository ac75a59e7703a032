use crate::error::CoreResult;
use crate::types::{PermissionSet, Resource};

// ---------------------------------------------------------------------------
// Session — an authenticated view of one account scope
// ---------------------------------------------------------------------------

/// A read-only handle on an authenticated account/region scope. Sessions
/// carry no mutable state from this component's perspective.
pub trait Session: Send + Sync {
    fn account_id(&self) -> &str;
    fn region(&self) -> &str;
}

// ---------------------------------------------------------------------------
// SessionFactory — credential/session provider shared across a policy tree
//
// A policy and any policy embedded inside its filters share one factory;
// the embedded policy never gets an independent authentication context.
// ---------------------------------------------------------------------------

pub trait SessionFactory: Send + Sync {
    fn session(&self) -> CoreResult<Box<dyn Session>>;
}

// ---------------------------------------------------------------------------
// ResourceProvider — enumeration backend for one resource type
// ---------------------------------------------------------------------------

/// Enumerates live resources of a single type. `enumerate` is a blocking
/// call; timeout and retry policy live inside the implementation.
pub trait ResourceProvider: Send + Sync {
    /// Resource-type identifier this provider serves (e.g. `"ec2"`).
    fn resource_type(&self) -> &str;

    /// Permissions required to enumerate this resource type.
    fn permissions(&self) -> PermissionSet;

    /// Whether this resource type can be enumerated in the session's
    /// environment (region/partition availability, feature gates).
    fn is_available(&self, session: &dyn Session) -> bool;

    /// Enumerate all live resources of this type visible to the session.
    fn enumerate(&self, session: &dyn Session) -> CoreResult<Vec<Resource>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify the trait objects are object-safe
    fn _assert_session_object_safe(_: &dyn Session) {}
    fn _assert_factory_object_safe(_: &dyn SessionFactory) {}
    fn _assert_provider_object_safe(_: &dyn ResourceProvider) {}

    struct NullSession;

    impl Session for NullSession {
        fn account_id(&self) -> &str {
            "000000000000"
        }
        fn region(&self) -> &str {
            "global"
        }
    }

    #[test]
    fn test_session_trait_impl() {
        let s: Box<dyn Session> = Box::new(NullSession);
        assert_eq!(s.account_id(), "000000000000");
        assert_eq!(s.region(), "global");
    }
}
