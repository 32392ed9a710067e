//! In-memory fake adapters.
//!
//! The fakes record every command they receive so tests can assert on the
//! controller's outward behavior, and expose just enough state (the
//! currently armed region) to synthesize realistic event streams back into
//! the controller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use crate::core::{PerimeterRegion, Position};

use super::{AlertSink, MotionClassifier, PerimeterWatch, PositionSource};

/// A recorded position-source command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SamplingCall {
    HighFrequency,
    SignificantChangeOnly,
    DisarmAll,
}

/// Records sampling commands.
#[derive(Debug, Default)]
pub struct FakePositionSource {
    calls: Mutex<Vec<SamplingCall>>,
}

impl FakePositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands received so far, in order.
    pub fn calls(&self) -> Vec<SamplingCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, call: SamplingCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl PositionSource for FakePositionSource {
    fn arm_high_frequency(&self) {
        self.push(SamplingCall::HighFrequency);
    }

    fn arm_significant_change_only(&self) {
        self.push(SamplingCall::SignificantChangeOnly);
    }

    fn disarm_all(&self) {
        self.push(SamplingCall::DisarmAll);
    }
}

/// Counts classifier arm requests.
#[derive(Debug, Default)]
pub struct FakeMotionClassifier {
    arm_count: AtomicUsize,
}

impl FakeMotionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn armed(&self) -> bool {
        self.arm_count.load(Ordering::SeqCst) > 0
    }

    pub fn arm_count(&self) -> usize {
        self.arm_count.load(Ordering::SeqCst)
    }
}

impl MotionClassifier for FakeMotionClassifier {
    fn arm_classifier(&self) {
        self.arm_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Tracks the currently armed perimeter region, mimicking a service that
/// watches at most one region per controller.
#[derive(Debug, Default)]
pub struct FakePerimeterWatch {
    armed: Mutex<Option<PerimeterRegion>>,
    disarmed: Mutex<Vec<Uuid>>,
}

impl FakePerimeterWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// The region currently being watched, if any.
    pub fn armed_region(&self) -> Option<PerimeterRegion> {
        self.armed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Identifiers of every region disarmed so far.
    pub fn disarmed(&self) -> Vec<Uuid> {
        self.disarmed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a fix falls outside the armed region, i.e. whether a real
    /// watch would report an exit for it.
    pub fn would_exit(&self, position: &Position) -> Option<Uuid> {
        self.armed_region()
            .filter(|region| !region.contains(position))
            .map(|region| region.id())
    }
}

impl PerimeterWatch for FakePerimeterWatch {
    fn arm_region(&self, region: &PerimeterRegion) {
        *self.armed.lock().unwrap_or_else(PoisonError::into_inner) = Some(region.clone());
    }

    fn disarm_region(&self, region: Uuid) {
        let mut armed = self.armed.lock().unwrap_or_else(PoisonError::into_inner);
        if armed.as_ref().is_some_and(|current| current.id() == region) {
            *armed = None;
        }
        self.disarmed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(region);
    }
}

/// Collects alert lines.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AlertSink for RecordingSink {
    fn notify(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}
