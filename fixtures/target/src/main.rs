//! Injection target: sleeps for the number of milliseconds given as the
//! first argument (default 15s) so tests have a live process to inject into.

use std::time::Duration;

fn main() {
    let sleep_ms = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(15_000);

    std::thread::sleep(Duration::from_millis(sleep_ms));
}
