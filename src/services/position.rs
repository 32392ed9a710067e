//! Position-sampling capability.

/// Commands the controller issues to the position-sampling service.
///
/// Fixes flow the other way: the adapter pushes them into the controller
/// via [`TrackingHandle::positions_updated`](crate::TrackingHandle::positions_updated).
pub trait PositionSource: Send + Sync {
    /// Begin continuous high-frequency sampling (Moving mode).
    fn arm_high_frequency(&self);

    /// Drop to low-power significant-change sampling only (Stationary
    /// mode, and the baseline armed at start).
    fn arm_significant_change_only(&self);

    /// Stop all sampling.
    fn disarm_all(&self);
}
