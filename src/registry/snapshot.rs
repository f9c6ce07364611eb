//! Point-in-time view of the endpoint universe.

use std::sync::Arc;

use crate::registry::endpoint::SharedEndpoint;

/// An immutable snapshot of the registry's endpoints.
///
/// A snapshot is never mutated after capture; every registry change produces
/// a wholly new snapshot with a higher version. Cloning is cheap and clones
/// share the underlying endpoint list.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    /// Monotonically increasing; distinguishes one endpoint set from the next.
    version: u64,
    endpoints: Arc<[SharedEndpoint]>,
}

impl RegistrySnapshot {
    /// Capture a snapshot at `version`.
    pub fn new(version: u64, endpoints: Vec<SharedEndpoint>) -> Self {
        Self {
            version,
            endpoints: endpoints.into(),
        }
    }

    /// The snapshot published before anything ever was: version 0, no endpoints.
    pub fn empty() -> Self {
        Self::new(0, Vec::new())
    }

    /// Version this snapshot was captured at.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Endpoints in registry order.
    pub fn endpoints(&self) -> &[SharedEndpoint] {
        &self.endpoints
    }

    /// Number of endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// True when the snapshot holds no endpoints.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::endpoint::{Endpoint, RouteValues};

    #[test]
    fn test_clones_share_endpoints() {
        let endpoint = Arc::new(Endpoint::new("home", RouteValues::new().with("controller", "Home")));
        let snapshot = RegistrySnapshot::new(1, vec![endpoint.clone()]);
        let copy = snapshot.clone();

        assert_eq!(copy.version(), 1);
        assert!(Arc::ptr_eq(&snapshot.endpoints()[0], &copy.endpoints()[0]));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RegistrySnapshot::empty();
        assert_eq!(snapshot.version(), 0);
        assert!(snapshot.is_empty());
    }
}
