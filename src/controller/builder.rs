//! Builder for constructing tracking controllers.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::TrackingConfig;
use crate::core::{ControllerState, Position};
use crate::services::{AlertSink, MotionClassifier, PerimeterWatch, PositionSource, TracingSink};

use super::error::BuildError;
use super::machine::{Collaborators, PositionCallback, TrackingController, TrackingHandle};

/// Builder for constructing a controller with a fluent API.
///
/// The three collaborator capabilities are required; the alert sink
/// defaults to [`TracingSink`] and the configuration to
/// [`TrackingConfig::default`].
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use paceline::services::fake::{FakeMotionClassifier, FakePerimeterWatch, FakePositionSource};
/// use paceline::TrackingControllerBuilder;
///
/// let built = TrackingControllerBuilder::new()
///     .position_source(Arc::new(FakePositionSource::new()))
///     .motion_classifier(Arc::new(FakeMotionClassifier::new()))
///     .perimeter_watch(Arc::new(FakePerimeterWatch::new()))
///     .build();
/// assert!(built.is_ok());
/// ```
pub struct TrackingControllerBuilder {
    config: TrackingConfig,
    positions: Option<Arc<dyn PositionSource>>,
    motion: Option<Arc<dyn MotionClassifier>>,
    perimeter: Option<Arc<dyn PerimeterWatch>>,
    sink: Option<Arc<dyn AlertSink>>,
    on_position: Option<PositionCallback>,
}

impl TrackingControllerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: TrackingConfig::default(),
            positions: None,
            motion: None,
            perimeter: None,
            sink: None,
            on_position: None,
        }
    }

    /// Override the configuration.
    pub fn config(mut self, config: TrackingConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the position-sampling service (required).
    pub fn position_source(mut self, source: Arc<dyn PositionSource>) -> Self {
        self.positions = Some(source);
        self
    }

    /// Set the motion-classification service (required).
    pub fn motion_classifier(mut self, classifier: Arc<dyn MotionClassifier>) -> Self {
        self.motion = Some(classifier);
        self
    }

    /// Set the geofence-monitoring service (required).
    pub fn perimeter_watch(mut self, watch: Arc<dyn PerimeterWatch>) -> Self {
        self.perimeter = Some(watch);
        self
    }

    /// Set the alert sink (optional).
    pub fn alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the position-observed callback (optional), invoked on every fix.
    pub fn on_position<F>(mut self, callback: F) -> Self
    where
        F: Fn(Position) + Send + Sync + 'static,
    {
        self.on_position = Some(Arc::new(callback));
        self
    }

    /// Build the controller and its handle.
    ///
    /// Returns an error if a required collaborator is missing. Spawn
    /// [`TrackingController::run`] onto a runtime to start processing.
    pub fn build(self) -> Result<(TrackingController, TrackingHandle), BuildError> {
        let positions = self.positions.ok_or(BuildError::MissingPositionSource)?;
        let motion = self.motion.ok_or(BuildError::MissingMotionClassifier)?;
        let perimeter = self.perimeter.ok_or(BuildError::MissingPerimeterWatch)?;
        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));

        let (events, queue) = mpsc::unbounded_channel();
        let controller = TrackingController::new(
            ControllerState::new(self.config),
            queue,
            events.downgrade(),
            Collaborators {
                positions,
                motion,
                perimeter,
                sink,
                on_position: self.on_position,
            },
        );
        Ok((controller, TrackingHandle::new(events)))
    }
}

impl Default for TrackingControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
