//! Fetching a Named Resource
//!
//! This example walks a controller through the three situations a consumer
//! runs into when it fetches something asynchronously:
//! - the fetch resolves while the consumer is still around
//! - the fetch fails and the error is handed to an outer boundary
//! - the consumer goes away before the fetch finishes
//!
//! Run with: cargo run --example fetch_resource

use liveguard::{AsyncController, AsyncState, AsyncStatus};
use std::time::Duration;

#[derive(Clone, Debug)]
struct Profile {
    name: String,
    followers: u32,
}

// Stand-in for a network call.
async fn fetch_profile(name: &'static str, delay: Duration) -> Result<Profile, String> {
    tokio::time::sleep(delay).await;
    match name {
        "missing" => Err(format!("profile '{name}' not found")),
        _ => Ok(Profile {
            name: name.to_string(),
            followers: name.len() as u32 * 100,
        }),
    }
}

fn render(state: &AsyncState<Profile, String>) {
    match state {
        AsyncState::Idle => println!("  [view] nothing requested yet"),
        AsyncState::Pending => println!("  [view] loading..."),
        AsyncState::Resolved(profile) => {
            println!("  [view] {} ({} followers)", profile.name, profile.followers)
        }
        AsyncState::Rejected(error) => println!("  [view] error boundary: {error}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("liveguard=debug").init();

    println!("=== Fetch Resource Example ===\n");

    println!("1. Fetch resolves while mounted:");
    let controller = AsyncController::builder().label("profile-ferris").build()?;
    render(&controller.state());
    let settlement = controller.start(fetch_profile("ferris", Duration::from_millis(20)));
    render(&controller.state());
    settlement.settled().await?;
    render(&controller.state());

    println!("\n2. Fetch fails:");
    let controller = AsyncController::builder().label("profile-missing").build()?;
    controller
        .start(fetch_profile("missing", Duration::from_millis(20)))
        .settled()
        .await?;
    render(&controller.state());
    if let Err(error) = controller.state().into_result() {
        println!("  [boundary] offering a reset after: {error}");
    }

    println!("\n3. Consumer unmounts before the fetch settles:");
    let controller = AsyncController::builder().label("profile-slow").build()?;
    let settlement = controller.start(fetch_profile("slowpoke", Duration::from_millis(50)));
    controller.detach();
    let delivery = settlement.settled().await?;
    println!("  delivery: {delivery:?}");
    assert_eq!(controller.status(), AsyncStatus::Pending);
    render(&controller.state());

    println!("\n4. Consumer conditionally skips work:");
    let controller = AsyncController::<Profile, String>::new()?;
    let requested: Option<&'static str> = None;
    let started = controller.run(requested.map(|name| fetch_profile(name, Duration::ZERO)));
    println!("  started: {}", started.is_some());
    render(&controller.state());

    println!("\nKey Takeaways:");
    println!("- The pending state is visible as soon as start() returns");
    println!("- Failures are data: the controller stores them and never raises");
    println!("- After detach, a late result is dropped and the state stays frozen");

    println!("\n=== Example Complete ===");
    Ok(())
}
