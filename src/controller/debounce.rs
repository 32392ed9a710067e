//! The demotion debounce timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::TrackingEvent;

use super::machine::ControlMessage;

/// Handle to the live debounce timer.
///
/// The sleeper task races the delay against a cancellation token:
/// cancellation wins whenever it is requested before the sleep completes.
/// A fire that is already in flight when the cancel lands is discarded by
/// the policy's generation check, so the race resolves deterministically
/// either way.
pub(crate) struct DebounceHandle {
    generation: u64,
    token: CancellationToken,
}

impl DebounceHandle {
    /// Spawn a sleeper that posts `DebounceElapsed { generation }` back
    /// into the controller's queue after `delay`.
    pub(crate) fn spawn(
        generation: u64,
        delay: Duration,
        events: mpsc::UnboundedSender<ControlMessage>,
    ) -> Self {
        let token = CancellationToken::new();
        let sleeper = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = sleeper.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = events.send(ControlMessage::Event(TrackingEvent::DebounceElapsed {
                        generation,
                    }));
                }
            }
        });
        Self { generation, token }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn cancel(self) {
        self.token.cancel();
    }
}
