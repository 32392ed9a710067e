//! Capability traits for the controller's external collaborators.
//!
//! The controller never talks to an operating-system service directly; it
//! issues commands against these traits. Production adapters bind them to
//! real location/motion services, and the fakes in [`fake`] drive the state
//! machine with synthetic events in tests and demos.
//!
//! Every method is a non-blocking, fire-and-forget command: the controller
//! does not wait on or retry acknowledgments.

mod motion;
mod perimeter;
mod position;
mod sink;

pub mod fake;

pub use motion::MotionClassifier;
pub use perimeter::PerimeterWatch;
pub use position::PositionSource;
pub use sink::{AlertSink, TracingSink};
