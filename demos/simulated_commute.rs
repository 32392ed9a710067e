//! Simulated Commute
//!
//! Drives the controller through a full walk / stop / geofence-breach cycle
//! using the in-memory fakes, with the debounce shortened so the demotion
//! is visible in real time.
//!
//! Run with: cargo run --example simulated_commute

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use paceline::services::fake::{
    FakeMotionClassifier, FakePerimeterWatch, FakePositionSource, RecordingSink,
};
use paceline::services::PositionSource;
use paceline::{MotionCategory, Position, TrackingConfig, TrackingControllerBuilder};

fn fix(latitude: f64, longitude: f64) -> Position {
    Position::new(latitude, longitude, Utc::now())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Simulated Commute ===\n");

    let positions = Arc::new(FakePositionSource::new());
    let motion = Arc::new(FakeMotionClassifier::new());
    let perimeter = Arc::new(FakePerimeterWatch::new());
    let sink = Arc::new(RecordingSink::new());

    let config = TrackingConfig {
        stop_timeout: Duration::from_millis(300),
        ..TrackingConfig::default()
    };

    let (controller, handle) = TrackingControllerBuilder::new()
        .config(config)
        .position_source(positions.clone())
        .motion_classifier(motion.clone())
        .perimeter_watch(perimeter.clone())
        .alert_sink(sink.clone())
        .on_position(|position| {
            println!(
                "  [Fix] {:.4}, {:.4} at {}",
                position.latitude, position.longitude, position.timestamp
            );
        })
        .build()
        .expect("all collaborators provided");
    tokio::spawn(controller.run());

    println!("Starting tracking and walking north...");
    handle.request_start();
    handle.activity_classified(MotionCategory::Walking);
    for step in 0..4 {
        handle.positions_updated(vec![fix(52.5200 + f64::from(step) * 0.0004, 13.4050)]);
    }

    println!("\nStopping at a cafe; waiting out the stop debounce...");
    handle.activity_classified(MotionCategory::Stationary);
    tokio::time::sleep(Duration::from_millis(450)).await;

    let status = handle.status().await.expect("controller alive");
    println!("  Mode is now: {}", status.mode.name());
    let region = perimeter.armed_region().expect("perimeter armed at rest");
    println!(
        "  Perimeter armed: {:.0} m around {:.4}, {:.4}",
        region.radius_m(),
        region.center().latitude,
        region.center().longitude
    );

    println!("\nLeaving without a motion signal; the perimeter catches it...");
    let afield = fix(52.5290, 13.4050);
    if let Some(exited) = perimeter.would_exit(&afield) {
        handle.region_exited(exited);
    }
    handle.positions_updated(vec![afield]);

    let status = handle.status().await.expect("controller alive");
    println!("  Mode is now: {}", status.mode.name());

    println!("\nMode path:");
    for transition in status.history.transitions() {
        println!(
            "  {} -> {} ({:?})",
            transition.from.name(),
            transition.to.name(),
            transition.trigger
        );
    }

    println!("\nAlert lines delivered: {}", sink.lines().len());

    handle.notify_terminating();
    let _ = handle.status().await;
    positions.disarm_all();

    println!("\n=== Demo Complete ===");
}
