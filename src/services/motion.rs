//! Motion-classification capability.

/// Commands the controller issues to the motion-classification service.
///
/// Classifications flow the other way: the adapter pushes them into the
/// controller via
/// [`TrackingHandle::activity_classified`](crate::TrackingHandle::activity_classified).
pub trait MotionClassifier: Send + Sync {
    /// Begin periodic activity classification.
    fn arm_classifier(&self);
}
