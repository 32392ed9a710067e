//! Perimeter-watch capability.

use uuid::Uuid;

use crate::core::PerimeterRegion;

/// Commands the controller issues to the geofence-monitoring service.
///
/// Exit events flow the other way: the adapter pushes them into the
/// controller via
/// [`TrackingHandle::region_exited`](crate::TrackingHandle::region_exited).
/// A watch fires once per armed region and must be re-armed after each
/// exit, which the controller does the next time it goes stationary.
pub trait PerimeterWatch: Send + Sync {
    /// Begin watching `region`; an exit should be reported with its id.
    fn arm_region(&self, region: &PerimeterRegion);

    /// Stop watching the region with this identifier.
    fn disarm_region(&self, region: Uuid);
}
