//! Mode transition history tracking.
//!
//! Provides immutable, process-lifetime tracking of mode changes together
//! with the input stream that caused each one. Nothing here is persisted
//! across restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::mode::TrackingMode;

/// Which input stream committed a transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TransitionTrigger {
    /// A caller-issued start request.
    StartRequest,
    /// An explicit `change_pace` override.
    Override,
    /// A positive motion classification.
    Classifier,
    /// The demotion debounce timer ran out.
    DebounceTimeout,
    /// The perimeter watch reported an exit.
    PerimeterExit,
}

/// Record of a single mode transition.
///
/// # Example
///
/// ```rust
/// use paceline::core::{ModeTransition, TransitionTrigger};
/// use paceline::TrackingMode;
/// use chrono::Utc;
///
/// let transition = ModeTransition {
///     from: TrackingMode::Stationary,
///     to: TrackingMode::Moving,
///     at: Utc::now(),
///     trigger: TransitionTrigger::Classifier,
/// };
/// assert_eq!(transition.to.name(), "Moving");
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct ModeTransition {
    /// The mode being transitioned from.
    pub from: TrackingMode,
    /// The mode being transitioned to.
    pub to: TrackingMode,
    /// When the transition was committed.
    pub at: DateTime<Utc>,
    /// The input stream that caused it.
    pub trigger: TransitionTrigger,
}

/// Ordered history of mode transitions.
///
/// History is immutable - the `record` method returns a new history with
/// the transition added.
///
/// # Example
///
/// ```rust
/// use paceline::core::{ModeHistory, ModeTransition, TransitionTrigger};
/// use paceline::TrackingMode;
/// use chrono::Utc;
///
/// let history = ModeHistory::new();
/// let history = history.record(ModeTransition {
///     from: TrackingMode::Stationary,
///     to: TrackingMode::Moving,
///     at: Utc::now(),
///     trigger: TransitionTrigger::StartRequest,
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![TrackingMode::Stationary, TrackingMode::Moving]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModeHistory {
    transitions: Vec<ModeTransition>,
}

impl ModeHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: ModeTransition) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// The path of modes traversed: the initial mode, then the `to` mode of
    /// each transition.
    pub fn get_path(&self) -> Vec<TrackingMode> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        for transition in &self.transitions {
            path.push(transition.to);
        }
        path
    }

    /// Total duration from first to last transition, `None` when the
    /// history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.at.signed_duration_since(first.at);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All recorded transitions in order.
    pub fn transitions(&self) -> &[ModeTransition] {
        &self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(
        from: TrackingMode,
        to: TrackingMode,
        trigger: TransitionTrigger,
    ) -> ModeTransition {
        ModeTransition {
            from,
            to,
            at: Utc::now(),
            trigger,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = ModeHistory::new();
        assert_eq!(history.transitions().len(), 0);
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = ModeHistory::new();
        let new_history = history.record(transition(
            TrackingMode::Stationary,
            TrackingMode::Moving,
            TransitionTrigger::StartRequest,
        ));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(new_history.transitions().len(), 1);
    }

    #[test]
    fn get_path_returns_mode_sequence() {
        let history = ModeHistory::new()
            .record(transition(
                TrackingMode::Stationary,
                TrackingMode::Moving,
                TransitionTrigger::StartRequest,
            ))
            .record(transition(
                TrackingMode::Moving,
                TrackingMode::Stationary,
                TransitionTrigger::DebounceTimeout,
            ));

        assert_eq!(
            history.get_path(),
            vec![
                TrackingMode::Stationary,
                TrackingMode::Moving,
                TrackingMode::Stationary,
            ]
        );
    }

    #[test]
    fn trigger_is_tracked() {
        let history = ModeHistory::new().record(transition(
            TrackingMode::Stationary,
            TrackingMode::Moving,
            TransitionTrigger::PerimeterExit,
        ));

        assert_eq!(
            history.transitions()[0].trigger,
            TransitionTrigger::PerimeterExit
        );
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let start = Utc::now();
        let later = start + chrono::Duration::seconds(42);

        let history = ModeHistory::new()
            .record(ModeTransition {
                from: TrackingMode::Stationary,
                to: TrackingMode::Moving,
                at: start,
                trigger: TransitionTrigger::StartRequest,
            })
            .record(ModeTransition {
                from: TrackingMode::Moving,
                to: TrackingMode::Stationary,
                at: later,
                trigger: TransitionTrigger::DebounceTimeout,
            });

        assert_eq!(history.duration(), Some(Duration::from_secs(42)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = ModeHistory::new().record(transition(
            TrackingMode::Stationary,
            TrackingMode::Moving,
            TransitionTrigger::Classifier,
        ));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: ModeHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(
            history.transitions().len(),
            deserialized.transitions().len()
        );
    }
}
