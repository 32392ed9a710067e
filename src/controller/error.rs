//! Build errors for the controller builder.

use thiserror::Error;

/// Errors that can occur when building a tracking controller.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Position source not specified. Call .position_source(source) before .build()")]
    MissingPositionSource,

    #[error("Motion classifier not specified. Call .motion_classifier(classifier) before .build()")]
    MissingMotionClassifier,

    #[error("Perimeter watch not specified. Call .perimeter_watch(watch) before .build()")]
    MissingPerimeterWatch,
}
