//! Output vocabulary of the controller.
//!
//! The pure policy never touches a collaborator; it describes what should
//! happen as [`Command`] values, and the shell executes them fire-and-forget
//! against the capability traits. A rejected arm request has no recovery
//! path, so commands carry no result channel.

use uuid::Uuid;

use super::position::{PerimeterRegion, Position};

/// A side effect requested by the transition policy.
#[derive(Clone, PartialEq, Debug)]
pub enum Command {
    /// Start the motion classifier's periodic updates.
    ArmClassifier,

    /// Switch the position source to continuous high-frequency sampling.
    ArmHighFrequency,

    /// Switch the position source to significant-change sampling only.
    ArmSignificantChangeOnly,

    /// Begin watching a perimeter region for exit.
    ArmRegion(PerimeterRegion),

    /// Stop watching the region with this identifier.
    DisarmRegion(Uuid),

    /// Schedule the demotion debounce timer. The shell posts
    /// `DebounceElapsed { generation }` back into the queue on expiry.
    ScheduleDebounce { generation: u64 },

    /// Cancel the live debounce timer.
    CancelDebounce,

    /// Deliver a fix to the caller's position-observed callback.
    PositionObserved(Position),

    /// One-line message for the alert sink.
    Alert(String),
}
