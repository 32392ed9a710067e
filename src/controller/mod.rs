//! The imperative shell: event loop, debounce timer, builder.
//!
//! All three input streams post into one queue and a single task drains it,
//! so no two transitions ever interleave. The only scheduled work is the
//! demotion debounce timer, whose cancellation is atomic relative to event
//! handling: cancel wins if requested before the timer's message is
//! processed, and a fire that slips into the queue afterwards is discarded
//! by its stale generation.

mod builder;
mod debounce;
mod error;
mod machine;

pub use builder::TrackingControllerBuilder;
pub use error::BuildError;
pub use machine::{PositionCallback, TrackingController, TrackingHandle, TrackingStatus};
