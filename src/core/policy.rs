//! The transition policy: the pure core of the controller.
//!
//! [`ControllerState`] is the full mutable state bundle, and
//! [`ControllerState::apply`] advances it by exactly one event, returning
//! the commands the shell must execute. Nothing here performs I/O or reads
//! the clock; the caller supplies `now`, which is what makes the whole
//! transition table unit-testable without a runtime.
//!
//! Demotion to `Stationary` is debounced: a `stationary` classification
//! while `Moving` only schedules a timer, and the demotion commits when the
//! timer's generation comes back unchallenged. Promotion to `Moving` is
//! immediate on any positive motion signal or perimeter exit.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::TrackingConfig;

use super::command::Command;
use super::event::{MotionCategory, TrackingEvent};
use super::history::{ModeHistory, ModeTransition, TransitionTrigger};
use super::mode::TrackingMode;
use super::position::{PerimeterRegion, Position};

/// The controller's full state bundle.
///
/// One instance exists per controller, owned by the event loop; every
/// accessor sees a state that is stable between events.
#[derive(Clone, Debug)]
pub struct ControllerState {
    mode: TrackingMode,
    last_position: Option<Position>,
    active_region: Option<Uuid>,
    debounce_generation: Option<u64>,
    next_generation: u64,
    pending_region_arm: bool,
    history: ModeHistory,
    config: TrackingConfig,
}

impl ControllerState {
    /// Create the initial state: `Stationary`, no fix, no region, no timer.
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            mode: TrackingMode::Stationary,
            last_position: None,
            active_region: None,
            debounce_generation: None,
            next_generation: 0,
            pending_region_arm: false,
            history: ModeHistory::new(),
            config,
        }
    }

    /// Current operating mode.
    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// The most recently observed fix, if any.
    pub fn last_position(&self) -> Option<&Position> {
        self.last_position.as_ref()
    }

    /// Identifier of the currently armed perimeter region, if any.
    pub fn active_region(&self) -> Option<Uuid> {
        self.active_region
    }

    /// Whether a demotion debounce timer is live.
    pub fn debounce_pending(&self) -> bool {
        self.debounce_generation.is_some()
    }

    /// Whether a perimeter arm is deferred until the next fix.
    pub fn pending_region_arm(&self) -> bool {
        self.pending_region_arm
    }

    /// Transition history since construction.
    pub fn history(&self) -> &ModeHistory {
        &self.history
    }

    /// The configuration this state was built with.
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Advance the state machine by one event.
    ///
    /// Returns the commands to execute, in order. The event is processed
    /// atomically: the caller must not interleave `apply` calls.
    pub fn apply(&mut self, event: TrackingEvent, now: DateTime<Utc>) -> Vec<Command> {
        match event {
            TrackingEvent::StartRequested => self.start_requested(now),
            TrackingEvent::PaceOverride { moving } => {
                if moving {
                    self.enter_moving(now, TransitionTrigger::Override)
                } else {
                    self.enter_stationary(now, TransitionTrigger::Override)
                }
            }
            TrackingEvent::PositionsUpdated(fixes) => self.positions_updated(fixes),
            TrackingEvent::ActivityClassified(category) => self.activity_classified(category, now),
            TrackingEvent::RegionExited(region) => self.region_exited(region, now),
            TrackingEvent::ArmPerimeterOnNextFix => {
                self.pending_region_arm = true;
                Vec::new()
            }
            TrackingEvent::DebounceElapsed { generation } => self.debounce_elapsed(generation, now),
            TrackingEvent::TerminationNotice => {
                vec![Command::Alert("application terminating".to_string())]
            }
        }
    }

    fn start_requested(&mut self, now: DateTime<Utc>) -> Vec<Command> {
        let mut commands = vec![
            Command::Alert("start tracking requested".to_string()),
            Command::ArmClassifier,
            Command::ArmSignificantChangeOnly,
        ];
        commands.extend(self.enter_moving(now, TransitionTrigger::StartRequest));
        commands
    }

    fn positions_updated(&mut self, fixes: Vec<Position>) -> Vec<Command> {
        let Some(fix) = fixes.last().copied() else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        match self.last_position {
            Some(previous) => commands.push(Command::Alert(format!(
                "fix observed {:.0} m from previous",
                previous.distance_m(&fix)
            ))),
            None => commands.push(Command::Alert("first fix observed".to_string())),
        }
        self.last_position = Some(fix);
        commands.push(Command::PositionObserved(fix));

        if self.pending_region_arm {
            self.arm_perimeter(&mut commands);
        }
        commands
    }

    fn activity_classified(
        &mut self,
        category: MotionCategory,
        now: DateTime<Utc>,
    ) -> Vec<Command> {
        match (category, self.mode) {
            (MotionCategory::Stationary, TrackingMode::Moving) => {
                // An earlier unchallenged deadline stands.
                if self.debounce_generation.is_some() {
                    return Vec::new();
                }
                let generation = self.next_generation;
                self.next_generation += 1;
                self.debounce_generation = Some(generation);
                vec![Command::ScheduleDebounce { generation }]
            }
            (category, TrackingMode::Stationary) if category.is_active() => {
                self.enter_moving(now, TransitionTrigger::Classifier)
            }
            (category, TrackingMode::Moving) if category.is_active() => {
                let mut commands = Vec::new();
                self.clear_debounce(&mut commands);
                commands
            }
            _ => Vec::new(),
        }
    }

    fn region_exited(&mut self, region: Uuid, now: DateTime<Utc>) -> Vec<Command> {
        if self.active_region != Some(region) {
            return Vec::new();
        }
        self.active_region = None;

        let mut commands = vec![
            Command::DisarmRegion(region),
            Command::Alert("left stationary perimeter".to_string()),
        ];
        commands.extend(self.enter_moving(now, TransitionTrigger::PerimeterExit));
        commands
    }

    fn debounce_elapsed(&mut self, generation: u64, now: DateTime<Utc>) -> Vec<Command> {
        if self.debounce_generation != Some(generation) {
            return Vec::new();
        }
        self.debounce_generation = None;
        self.enter_stationary(now, TransitionTrigger::DebounceTimeout)
    }

    fn enter_moving(&mut self, now: DateTime<Utc>, trigger: TransitionTrigger) -> Vec<Command> {
        let mut commands = Vec::new();
        self.clear_debounce(&mut commands);
        self.pending_region_arm = false;

        if self.mode != TrackingMode::Moving {
            self.history = self.history.record(ModeTransition {
                from: self.mode,
                to: TrackingMode::Moving,
                at: now,
                trigger,
            });
            self.mode = TrackingMode::Moving;
            commands.push(Command::Alert("entering moving state".to_string()));
        }
        commands.push(Command::ArmHighFrequency);
        commands
    }

    fn enter_stationary(&mut self, now: DateTime<Utc>, trigger: TransitionTrigger) -> Vec<Command> {
        let mut commands = Vec::new();
        self.clear_debounce(&mut commands);

        if self.mode != TrackingMode::Stationary {
            self.history = self.history.record(ModeTransition {
                from: self.mode,
                to: TrackingMode::Stationary,
                at: now,
                trigger,
            });
            self.mode = TrackingMode::Stationary;
            commands.push(Command::Alert("entering stationary state".to_string()));
        }
        self.arm_perimeter(&mut commands);
        commands.push(Command::ArmSignificantChangeOnly);
        commands
    }

    /// Arm a perimeter around the last fix, superseding any active region.
    /// Without a fix the arm is deferred until one arrives.
    fn arm_perimeter(&mut self, commands: &mut Vec<Command>) {
        match self.last_position {
            Some(center) => {
                if let Some(old) = self.active_region.take() {
                    commands.push(Command::DisarmRegion(old));
                }
                let region = PerimeterRegion::around(center, self.config.region_radius_m);
                self.active_region = Some(region.id());
                self.pending_region_arm = false;
                commands.push(Command::ArmRegion(region));
            }
            None => {
                self.pending_region_arm = true;
            }
        }
    }

    fn clear_debounce(&mut self, commands: &mut Vec<Command>) {
        if self.debounce_generation.take().is_some() {
            commands.push(Command::CancelDebounce);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ControllerState {
        ControllerState::new(TrackingConfig::default())
    }

    fn at() -> DateTime<Utc> {
        Utc::now()
    }

    fn fix(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude, Utc::now())
    }

    fn scheduled_generation(commands: &[Command]) -> Option<u64> {
        commands.iter().find_map(|command| match command {
            Command::ScheduleDebounce { generation } => Some(*generation),
            _ => None,
        })
    }

    fn armed_region(commands: &[Command]) -> Option<&PerimeterRegion> {
        commands.iter().find_map(|command| match command {
            Command::ArmRegion(region) => Some(region),
            _ => None,
        })
    }

    #[test]
    fn initial_state_is_stationary_with_nothing_armed() {
        let state = state();
        assert_eq!(state.mode(), TrackingMode::Stationary);
        assert!(state.last_position().is_none());
        assert!(state.active_region().is_none());
        assert!(!state.debounce_pending());
        assert!(!state.pending_region_arm());
    }

    #[test]
    fn start_promotes_to_moving_and_arms_sources() {
        let mut state = state();
        let commands = state.apply(TrackingEvent::StartRequested, at());

        assert_eq!(state.mode(), TrackingMode::Moving);
        assert!(commands.contains(&Command::ArmClassifier));
        assert!(commands.contains(&Command::ArmSignificantChangeOnly));
        assert!(commands.contains(&Command::ArmHighFrequency));
        assert_eq!(
            state.history().transitions()[0].trigger,
            TransitionTrigger::StartRequest
        );
    }

    #[test]
    fn start_is_idempotent() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        state.apply(TrackingEvent::StartRequested, at());

        assert_eq!(state.mode(), TrackingMode::Moving);
        assert_eq!(state.history().transitions().len(), 1);
    }

    #[test]
    fn pace_override_moves_both_ways() {
        let mut state = state();
        state.apply(TrackingEvent::PaceOverride { moving: true }, at());
        assert_eq!(state.mode(), TrackingMode::Moving);

        state.apply(TrackingEvent::PaceOverride { moving: false }, at());
        assert_eq!(state.mode(), TrackingMode::Stationary);

        let path = state.history().get_path();
        assert_eq!(
            path,
            vec![
                TrackingMode::Stationary,
                TrackingMode::Moving,
                TrackingMode::Stationary,
            ]
        );
    }

    #[test]
    fn stationary_while_moving_schedules_debounce() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());

        let commands = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );

        assert_eq!(state.mode(), TrackingMode::Moving);
        assert!(state.debounce_pending());
        assert!(scheduled_generation(&commands).is_some());
    }

    #[test]
    fn repeated_stationary_keeps_the_first_deadline() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());

        let first = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );
        let second = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );

        assert!(scheduled_generation(&first).is_some());
        assert!(second.is_empty());
    }

    #[test]
    fn stationary_while_stationary_is_ignored() {
        let mut state = state();
        let commands = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );

        assert!(commands.is_empty());
        assert_eq!(state.mode(), TrackingMode::Stationary);
        assert!(!state.debounce_pending());
    }

    #[test]
    fn active_category_while_stationary_promotes_immediately() {
        for category in [
            MotionCategory::Walking,
            MotionCategory::Running,
            MotionCategory::Automotive,
        ] {
            let mut state = state();
            let commands = state.apply(TrackingEvent::ActivityClassified(category), at());

            assert_eq!(state.mode(), TrackingMode::Moving);
            assert!(commands.contains(&Command::ArmHighFrequency));
            assert_eq!(
                state.history().transitions()[0].trigger,
                TransitionTrigger::Classifier
            );
        }
    }

    #[test]
    fn active_category_while_moving_cancels_pending_debounce() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );
        assert!(state.debounce_pending());

        let commands = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Walking),
            at(),
        );

        assert!(!state.debounce_pending());
        assert!(commands.contains(&Command::CancelDebounce));
        assert_eq!(state.mode(), TrackingMode::Moving);
    }

    #[test]
    fn active_category_while_moving_without_debounce_is_ignored() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());

        let commands = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Automotive),
            at(),
        );

        assert!(commands.is_empty());
        assert_eq!(state.history().transitions().len(), 1);
    }

    #[test]
    fn unknown_category_is_ignored_in_both_modes() {
        let mut state = state();
        assert!(state
            .apply(TrackingEvent::ActivityClassified(MotionCategory::Unknown), at())
            .is_empty());

        state.apply(TrackingEvent::StartRequested, at());
        assert!(state
            .apply(TrackingEvent::ActivityClassified(MotionCategory::Unknown), at())
            .is_empty());
    }

    #[test]
    fn debounce_elapsed_commits_demotion_and_arms_region() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        state.apply(TrackingEvent::PositionsUpdated(vec![fix(52.52, 13.405)]), at());
        let commands = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );
        let generation = scheduled_generation(&commands).unwrap();

        let commands = state.apply(TrackingEvent::DebounceElapsed { generation }, at());

        assert_eq!(state.mode(), TrackingMode::Stationary);
        assert!(!state.debounce_pending());
        let region = armed_region(&commands).unwrap();
        assert_eq!(region.center().latitude, 52.52);
        assert_eq!(region.radius_m(), 100.0);
        assert_eq!(state.active_region(), Some(region.id()));
        assert_eq!(
            state.history().transitions().last().unwrap().trigger,
            TransitionTrigger::DebounceTimeout
        );
    }

    #[test]
    fn stale_debounce_generation_is_ignored() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        let commands = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );
        let generation = scheduled_generation(&commands).unwrap();

        // Contrary signal cancels; the fire is already in flight.
        state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Walking),
            at(),
        );
        let commands = state.apply(TrackingEvent::DebounceElapsed { generation }, at());

        assert!(commands.is_empty());
        assert_eq!(state.mode(), TrackingMode::Moving);
    }

    #[test]
    fn demotion_without_fix_defers_the_region() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        let commands = state.apply(TrackingEvent::PaceOverride { moving: false }, at());

        assert_eq!(state.mode(), TrackingMode::Stationary);
        assert!(armed_region(&commands).is_none());
        assert!(state.pending_region_arm());

        let commands = state.apply(TrackingEvent::PositionsUpdated(vec![fix(48.85, 2.35)]), at());
        let region = armed_region(&commands).unwrap();
        assert_eq!(region.center().latitude, 48.85);
        assert!(!state.pending_region_arm());
        assert_eq!(state.active_region(), Some(region.id()));
    }

    #[test]
    fn arm_on_next_fix_sets_the_pending_flag() {
        let mut state = state();
        assert!(state.apply(TrackingEvent::ArmPerimeterOnNextFix, at()).is_empty());
        assert!(state.pending_region_arm());

        let commands = state.apply(TrackingEvent::PositionsUpdated(vec![fix(48.85, 2.35)]), at());
        assert!(armed_region(&commands).is_some());
        assert!(!state.pending_region_arm());
    }

    #[test]
    fn entering_moving_clears_the_pending_flag() {
        let mut state = state();
        state.apply(TrackingEvent::ArmPerimeterOnNextFix, at());
        state.apply(TrackingEvent::PaceOverride { moving: true }, at());
        assert!(!state.pending_region_arm());
    }

    #[test]
    fn fixes_update_last_position_and_reach_the_callback() {
        let mut state = state();
        let first = fix(40.0, -74.0);
        let second = fix(40.001, -74.0);

        let commands = state.apply(TrackingEvent::PositionsUpdated(vec![first]), at());
        assert!(commands.contains(&Command::PositionObserved(first)));
        assert!(commands.contains(&Command::Alert("first fix observed".to_string())));

        let commands = state.apply(TrackingEvent::PositionsUpdated(vec![second]), at());
        assert!(commands.contains(&Command::PositionObserved(second)));
        assert!(commands.iter().any(|command| matches!(
            command,
            Command::Alert(line) if line.contains("m from previous")
        )));
        assert_eq!(state.last_position(), Some(&second));
    }

    #[test]
    fn only_the_last_fix_of_a_batch_is_used() {
        let mut state = state();
        let stale = fix(40.0, -74.0);
        let fresh = fix(41.0, -74.0);

        let commands = state.apply(TrackingEvent::PositionsUpdated(vec![stale, fresh]), at());

        assert_eq!(state.last_position(), Some(&fresh));
        assert!(commands.contains(&Command::PositionObserved(fresh)));
        assert!(!commands.contains(&Command::PositionObserved(stale)));
    }

    #[test]
    fn empty_fix_batch_is_a_noop() {
        let mut state = state();
        assert!(state.apply(TrackingEvent::PositionsUpdated(Vec::new()), at()).is_empty());
        assert!(state.last_position().is_none());
    }

    #[test]
    fn region_exit_promotes_and_disarms() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        state.apply(TrackingEvent::PositionsUpdated(vec![fix(52.52, 13.405)]), at());
        state.apply(TrackingEvent::PaceOverride { moving: false }, at());
        let region = state.active_region().unwrap();

        let commands = state.apply(TrackingEvent::RegionExited(region), at());

        assert_eq!(state.mode(), TrackingMode::Moving);
        assert!(state.active_region().is_none());
        assert!(commands.contains(&Command::DisarmRegion(region)));
        assert_eq!(
            state.history().transitions().last().unwrap().trigger,
            TransitionTrigger::PerimeterExit
        );
    }

    #[test]
    fn stale_region_exit_is_ignored() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        state.apply(TrackingEvent::PositionsUpdated(vec![fix(52.52, 13.405)]), at());
        state.apply(TrackingEvent::PaceOverride { moving: false }, at());
        let region = state.active_region().unwrap();

        state.apply(TrackingEvent::RegionExited(region), at());
        let replay = state.apply(TrackingEvent::RegionExited(region), at());

        assert!(replay.is_empty());
        assert_eq!(state.mode(), TrackingMode::Moving);
        // Exactly one promotion from the exit, no double-transition.
        assert_eq!(state.history().transitions().len(), 3);
    }

    #[test]
    fn exit_for_a_never_armed_region_is_ignored() {
        let mut state = state();
        let commands = state.apply(TrackingEvent::RegionExited(Uuid::new_v4()), at());
        assert!(commands.is_empty());
        assert_eq!(state.mode(), TrackingMode::Stationary);
    }

    #[test]
    fn rearming_supersedes_the_old_region() {
        let mut state = state();
        state.apply(TrackingEvent::PositionsUpdated(vec![fix(52.52, 13.405)]), at());
        state.apply(TrackingEvent::PaceOverride { moving: false }, at());
        let old = state.active_region().unwrap();

        let commands = state.apply(TrackingEvent::PaceOverride { moving: false }, at());

        let new = state.active_region().unwrap();
        assert_ne!(old, new);
        assert!(commands.contains(&Command::DisarmRegion(old)));
        assert_eq!(armed_region(&commands).unwrap().id(), new);
    }

    #[test]
    fn demotion_cancels_a_live_debounce() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );
        assert!(state.debounce_pending());

        let commands = state.apply(TrackingEvent::PaceOverride { moving: false }, at());

        assert!(!state.debounce_pending());
        assert!(commands.contains(&Command::CancelDebounce));
    }

    #[test]
    fn termination_notice_changes_nothing() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());
        let before = state.mode();

        let commands = state.apply(TrackingEvent::TerminationNotice, at());

        assert_eq!(state.mode(), before);
        assert_eq!(
            commands,
            vec![Command::Alert("application terminating".to_string())]
        );
    }

    #[test]
    fn generations_are_never_reused() {
        let mut state = state();
        state.apply(TrackingEvent::StartRequested, at());

        let first = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );
        state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Walking),
            at(),
        );
        let second = state.apply(
            TrackingEvent::ActivityClassified(MotionCategory::Stationary),
            at(),
        );

        assert_ne!(
            scheduled_generation(&first).unwrap(),
            scheduled_generation(&second).unwrap()
        );
    }
}
