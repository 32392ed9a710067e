//! Tuning knobs for the tracking controller.
//!
//! The defaults mirror a pedestrian/vehicle tracking profile: a five-minute
//! quiet period before demoting to low-power sampling, and a 100 m perimeter
//! around the resting position.

use std::time::Duration;

/// Configuration for a [`TrackingController`](crate::TrackingController).
///
/// # Example
///
/// ```rust
/// use paceline::TrackingConfig;
/// use std::time::Duration;
///
/// let config = TrackingConfig {
///     stop_timeout: Duration::from_secs(120),
///     ..TrackingConfig::default()
/// };
/// assert_eq!(config.region_radius_m, 100.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingConfig {
    /// Quiet period a `stationary` classification must survive before the
    /// controller commits the demotion to `Stationary`.
    pub stop_timeout: Duration,

    /// Radius of the perimeter region armed around the last known position
    /// when entering `Stationary`.
    pub region_radius_m: f64,

    /// Minimum displacement between reported fixes. The controller itself
    /// does not filter; production position-source adapters are expected to
    /// apply this when arming the underlying sampling service.
    pub distance_filter_m: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(300),
            region_radius_m: 100.0,
            distance_filter_m: 50.0,
        }
    }
}
