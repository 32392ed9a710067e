//! The controller's two-valued operating mode.
//!
//! `Moving` drives high-frequency position sampling; `Stationary` suspends
//! it and relies on a perimeter trigger instead. The mode is the entire
//! persistent state of the controller besides the auxiliary fields tracked
//! alongside it.

use serde::{Deserialize, Serialize};

/// Operating mode of the tracking controller.
///
/// Exactly one value at any time. The initial mode is `Stationary`; a start
/// request promotes to `Moving`.
///
/// # Example
///
/// ```rust
/// use paceline::TrackingMode;
///
/// let mode = TrackingMode::Stationary;
/// assert_eq!(mode.name(), "Stationary");
/// assert!(mode.is_low_power());
/// assert!(!TrackingMode::Moving.is_low_power());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TrackingMode {
    /// Continuous high-frequency sampling; fresh fixes preferred over
    /// battery savings.
    Moving,
    /// Significant-change sampling only; a perimeter watch guards the
    /// resting position.
    Stationary,
}

impl TrackingMode {
    /// The mode's name for display and logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Moving => "Moving",
            Self::Stationary => "Stationary",
        }
    }

    /// Whether this mode suspends continuous sampling.
    pub fn is_low_power(&self) -> bool {
        matches!(self, Self::Stationary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_name_returns_correct_value() {
        assert_eq!(TrackingMode::Moving.name(), "Moving");
        assert_eq!(TrackingMode::Stationary.name(), "Stationary");
    }

    #[test]
    fn stationary_is_the_low_power_mode() {
        assert!(TrackingMode::Stationary.is_low_power());
        assert!(!TrackingMode::Moving.is_low_power());
    }

    #[test]
    fn mode_serializes_correctly() {
        let mode = TrackingMode::Moving;
        let json = serde_json::to_string(&mode).unwrap();
        let deserialized: TrackingMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, deserialized);
    }
}
