//! Deferred Perimeter
//!
//! Shows the deferred-arming path: going stationary before any fix exists
//! does not create a region; the perimeter is armed as soon as the first
//! fix arrives.
//!
//! Run with: cargo run --example deferred_perimeter

use std::sync::Arc;

use chrono::Utc;
use paceline::services::fake::{FakeMotionClassifier, FakePerimeterWatch, FakePositionSource};
use paceline::{Position, TrackingControllerBuilder};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Deferred Perimeter ===\n");

    let perimeter = Arc::new(FakePerimeterWatch::new());
    let (controller, handle) = TrackingControllerBuilder::new()
        .position_source(Arc::new(FakePositionSource::new()))
        .motion_classifier(Arc::new(FakeMotionClassifier::new()))
        .perimeter_watch(perimeter.clone())
        .build()
        .expect("all collaborators provided");
    tokio::spawn(controller.run());

    println!("Going stationary before any fix has arrived...");
    handle.request_start();
    handle.change_pace(false);

    let status = handle.status().await.expect("controller alive");
    println!("  Mode: {}", status.mode.name());
    println!("  Region armed: {}", perimeter.armed_region().is_some());

    println!("\nFirst fix arrives...");
    handle.positions_updated(vec![Position::new(48.8566, 2.3522, Utc::now())]);

    let status = handle.status().await.expect("controller alive");
    match perimeter.armed_region() {
        Some(region) => println!(
            "  Region armed: {:.0} m around {:.4}, {:.4} (id {})",
            region.radius_m(),
            region.center().latitude,
            region.center().longitude,
            region.id()
        ),
        None => println!("  Region armed: false"),
    }
    println!("  Active region in status: {:?}", status.active_region);

    println!("\n=== Demo Complete ===");
}
