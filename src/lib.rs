//! Paceline: an adaptive location-tracking controller.
//!
//! Paceline decides, from a stream of raw position fixes, motion-classifier
//! events and geofence-exit signals, when to actively sample location (high
//! power draw) versus suspend sampling and rely on a cheap perimeter
//! trigger (low power draw). The decision logic is a two-state machine
//! (`Moving` / `Stationary`) with a debounce timer that avoids premature
//! mode flapping: demotion waits out a quiet period, promotion is
//! immediate.
//!
//! The crate follows a "pure core, imperative shell" split:
//!
//! - [`core`] holds the pure transition policy - events in, commands out,
//!   no I/O, no clock.
//! - [`controller`] holds the shell - a single task that owns the state
//!   bundle, serializes all event handling, and executes commands against
//!   the collaborator capabilities.
//! - [`services`] defines those capabilities (position source, motion
//!   classifier, perimeter watch, alert sink) as traits, with in-memory
//!   fakes for deterministic tests.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use paceline::services::fake::{FakeMotionClassifier, FakePerimeterWatch, FakePositionSource};
//! use paceline::{MotionCategory, TrackingControllerBuilder, TrackingMode};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let (controller, handle) = TrackingControllerBuilder::new()
//!         .position_source(Arc::new(FakePositionSource::new()))
//!         .motion_classifier(Arc::new(FakeMotionClassifier::new()))
//!         .perimeter_watch(Arc::new(FakePerimeterWatch::new()))
//!         .build()
//!         .unwrap();
//!     tokio::spawn(controller.run());
//!
//!     handle.request_start();
//!     handle.activity_classified(MotionCategory::Walking);
//!
//!     let status = handle.status().await.unwrap();
//!     assert_eq!(status.mode, TrackingMode::Moving);
//! }
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod services;

// Re-export commonly used types
pub use config::TrackingConfig;
pub use controller::{
    BuildError, TrackingController, TrackingControllerBuilder, TrackingHandle, TrackingStatus,
};
pub use core::{MotionCategory, PerimeterRegion, Position, TrackingEvent, TrackingMode};
