//! The controller's event loop: the imperative shell around the policy.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::{
    Command, ControllerState, ModeHistory, MotionCategory, Position, TrackingEvent, TrackingMode,
};
use crate::services::{AlertSink, MotionClassifier, PerimeterWatch, PositionSource};

use super::debounce::DebounceHandle;

/// Caller-provided callback invoked on every observed fix.
pub type PositionCallback = Arc<dyn Fn(Position) + Send + Sync>;

/// The external collaborators the shell executes commands against.
pub(crate) struct Collaborators {
    pub(crate) positions: Arc<dyn PositionSource>,
    pub(crate) motion: Arc<dyn MotionClassifier>,
    pub(crate) perimeter: Arc<dyn PerimeterWatch>,
    pub(crate) sink: Arc<dyn AlertSink>,
    pub(crate) on_position: Option<PositionCallback>,
}

pub(crate) enum ControlMessage {
    Event(TrackingEvent),
    Status(oneshot::Sender<TrackingStatus>),
}

/// Point-in-time snapshot of the controller, taken between events.
#[derive(Clone, Debug)]
pub struct TrackingStatus {
    pub mode: TrackingMode,
    pub last_position: Option<Position>,
    pub active_region: Option<Uuid>,
    pub debounce_pending: bool,
    pub history: ModeHistory,
}

/// Owns the full mutable state bundle and serializes all event handling.
///
/// Built by [`TrackingControllerBuilder`](super::TrackingControllerBuilder);
/// spawn [`run`](TrackingController::run) onto a runtime and drive it
/// through the [`TrackingHandle`]. One message is processed at a time, so
/// every event sees a stable prior state and commits the next state before
/// any other event is looked at.
pub struct TrackingController {
    state: ControllerState,
    queue: mpsc::UnboundedReceiver<ControlMessage>,
    /// Weak so an idle controller does not keep itself alive; upgraded only
    /// to hand the debounce timer a way to post back.
    events: mpsc::WeakUnboundedSender<ControlMessage>,
    collaborators: Collaborators,
    debounce: Option<DebounceHandle>,
}

impl TrackingController {
    pub(crate) fn new(
        state: ControllerState,
        queue: mpsc::UnboundedReceiver<ControlMessage>,
        events: mpsc::WeakUnboundedSender<ControlMessage>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            state,
            queue,
            events,
            collaborators,
            debounce: None,
        }
    }

    /// Drain the queue until every handle (and any live timer) is gone.
    pub async fn run(mut self) {
        debug!("tracking controller started");
        while let Some(message) = self.queue.recv().await {
            match message {
                ControlMessage::Event(event) => self.handle(event),
                ControlMessage::Status(reply) => {
                    let _ = reply.send(self.status());
                }
            }
        }
        if let Some(handle) = self.debounce.take() {
            handle.cancel();
        }
        debug!("tracking controller stopped");
    }

    fn handle(&mut self, event: TrackingEvent) {
        debug!(?event, "processing event");
        if let TrackingEvent::DebounceElapsed { generation } = event {
            if self
                .debounce
                .as_ref()
                .is_some_and(|handle| handle.generation() == generation)
            {
                self.debounce = None;
            }
        }
        let commands = self.state.apply(event, Utc::now());
        self.execute(commands);
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::ArmClassifier => {
                    debug!("arming motion classifier");
                    self.collaborators.motion.arm_classifier();
                }
                Command::ArmHighFrequency => {
                    debug!("arming high-frequency sampling");
                    self.collaborators.positions.arm_high_frequency();
                }
                Command::ArmSignificantChangeOnly => {
                    debug!("arming significant-change sampling");
                    self.collaborators.positions.arm_significant_change_only();
                }
                Command::ArmRegion(region) => {
                    debug!(region = %region.id(), radius_m = region.radius_m(), "arming perimeter region");
                    self.collaborators.perimeter.arm_region(&region);
                }
                Command::DisarmRegion(region) => {
                    debug!(region = %region, "disarming perimeter region");
                    self.collaborators.perimeter.disarm_region(region);
                }
                Command::ScheduleDebounce { generation } => self.schedule_debounce(generation),
                Command::CancelDebounce => self.cancel_debounce(),
                Command::PositionObserved(position) => {
                    if let Some(callback) = &self.collaborators.on_position {
                        callback(position);
                    }
                }
                Command::Alert(line) => {
                    info!("{line}");
                    self.collaborators.sink.notify(&line);
                }
            }
        }
    }

    fn schedule_debounce(&mut self, generation: u64) {
        if let Some(previous) = self.debounce.take() {
            previous.cancel();
        }
        let Some(events) = self.events.upgrade() else {
            return;
        };
        let delay = self.state.config().stop_timeout;
        debug!(generation, delay_s = delay.as_secs(), "scheduling stop debounce");
        self.debounce = Some(DebounceHandle::spawn(generation, delay, events));
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            debug!(generation = handle.generation(), "cancelling stop debounce");
            handle.cancel();
        }
    }

    fn status(&self) -> TrackingStatus {
        TrackingStatus {
            mode: self.state.mode(),
            last_position: self.state.last_position().copied(),
            active_region: self.state.active_region(),
            debounce_pending: self.state.debounce_pending(),
            history: self.state.history().clone(),
        }
    }
}

/// Clonable front door to a running controller.
///
/// External callbacks (position source, motion classifier, perimeter watch
/// adapters) and the caller's own UI layer all post through a handle; the
/// posts are fire-and-forget and the controller processes them in arrival
/// order.
#[derive(Clone)]
pub struct TrackingHandle {
    events: mpsc::UnboundedSender<ControlMessage>,
}

impl TrackingHandle {
    pub(crate) fn new(events: mpsc::UnboundedSender<ControlMessage>) -> Self {
        Self { events }
    }

    /// Begin tracking. Idempotent.
    pub fn request_start(&self) {
        self.post(TrackingEvent::StartRequested);
    }

    /// Explicitly override the pace.
    pub fn change_pace(&self, moving: bool) {
        self.post(TrackingEvent::PaceOverride { moving });
    }

    /// Push a batch of fixes; only the last element is used.
    pub fn positions_updated(&self, fixes: Vec<Position>) {
        self.post(TrackingEvent::PositionsUpdated(fixes));
    }

    /// Push a motion classification.
    pub fn activity_classified(&self, category: MotionCategory) {
        self.post(TrackingEvent::ActivityClassified(category));
    }

    /// Report that the device left the region with this identifier.
    pub fn region_exited(&self, region: Uuid) {
        self.post(TrackingEvent::RegionExited(region));
    }

    /// Arm a perimeter region as soon as the next fix arrives.
    pub fn arm_perimeter_on_next_fix(&self) {
        self.post(TrackingEvent::ArmPerimeterOnNextFix);
    }

    /// Logging hook for application shutdown; changes no state.
    pub fn notify_terminating(&self) {
        self.post(TrackingEvent::TerminationNotice);
    }

    /// Snapshot the controller's state. Returns `None` once the controller
    /// has stopped.
    pub async fn status(&self) -> Option<TrackingStatus> {
        let (reply, response) = oneshot::channel();
        if self.events.send(ControlMessage::Status(reply)).is_err() {
            return None;
        }
        response.await.ok()
    }

    fn post(&self, event: TrackingEvent) {
        if self.events.send(ControlMessage::Event(event)).is_err() {
            warn!("tracking controller is gone, dropping event");
        }
    }
}
