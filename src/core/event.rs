//! Input vocabulary of the controller.
//!
//! Three asynchronous streams (position fixes, motion classifications,
//! perimeter exits) plus the caller-facing requests all arrive as
//! [`TrackingEvent`]s posted into the controller's queue, which is what
//! serializes them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::position::Position;

/// Category reported by the motion classifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MotionCategory {
    Stationary,
    Walking,
    Running,
    Automotive,
    Unknown,
}

impl MotionCategory {
    /// Whether this category is a positive motion signal.
    ///
    /// Positive signals promote to `Moving` immediately and cancel a
    /// pending demotion; `Unknown` is neither positive nor negative.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Walking | Self::Running | Self::Automotive)
    }
}

/// An event consumed by the tracking controller.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum TrackingEvent {
    /// Caller requested tracking to begin. Idempotent.
    StartRequested,

    /// Explicit external pace override, also used internally by the policy.
    PaceOverride { moving: bool },

    /// Batch of fixes pushed by the position source; only the last element
    /// is used, and an empty batch is a no-op.
    PositionsUpdated(Vec<Position>),

    /// Periodic classification pushed by the motion classifier.
    ActivityClassified(MotionCategory),

    /// The perimeter watch reported that the device left a region.
    RegionExited(Uuid),

    /// Arm a perimeter region as soon as the next fix arrives.
    ArmPerimeterOnNextFix,

    /// The debounce timer for `generation` ran to completion. Internal;
    /// posted by the timer task, discarded when the generation is stale.
    DebounceElapsed { generation: u64 },

    /// The hosting application is terminating. Logging hook only.
    TerminationNotice,
}
