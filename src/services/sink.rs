//! Side-channel alert sink.

use tracing::info;

/// Receives a one-line text message on every transition and every fix.
///
/// Deliveries are fire-and-forget; implementations must not block and
/// failures are ignored.
pub trait AlertSink: Send + Sync {
    fn notify(&self, line: &str);
}

/// Default sink: forwards every line to `tracing` at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl AlertSink for TracingSink {
    fn notify(&self, line: &str) {
        info!(target: "paceline::alert", "{line}");
    }
}
