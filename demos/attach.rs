//! Injects an agent library into an already-running process.
//!
//! ```text
//! cargo run --example attach -- <pid> <agent-crate-or-library> [data]
//! ```

use std::path::Path;

use graft::{Payload, Target};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(pid), Some(agent)) = (args.next(), args.next()) else {
        eprintln!("usage: attach <pid> <agent-crate-or-library> [data]");
        std::process::exit(2);
    };

    let pid: i32 = pid.parse()?;
    let target = Target::from_pid(pid)?;

    let mut payload = payload_from(&agent)?;
    if let Some(data) = args.next() {
        payload = payload.with_data(data)?;
    }

    let grafted = graft::inject(target, &payload)?;
    println!(
        "injected into pid {} (injection id {})",
        grafted.target().pid(),
        grafted.injection_id()
    );

    grafted.demonitor()?;
    println!("demonitored; the library stays loaded");

    Ok(())
}

/// Treats the argument as an agent crate when it looks like one, and as a
/// prebuilt library otherwise.
fn payload_from(agent: &str) -> Result<Payload, graft::GraftError> {
    let path = Path::new(agent);
    if path.join("Cargo.toml").is_file() || path.ends_with("Cargo.toml") {
        Payload::from_crate(path)
    } else {
        Payload::from_path(path)
    }
}
