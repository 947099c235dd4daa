// Common test utilities for integration tests
// This module contains shared code for all integration tests

use std::sync::Once;

use log::LevelFilter;
use tokio::time::{sleep, Duration};

use murmur::{sim::EventReceiver, MockData, Shell};

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// Shell over the built-in sample data with chat "1" open, as the app starts
pub fn new_shell() -> (Shell, EventReceiver) {
    setup_logging();
    let data = MockData::builtin().expect("built-in mock data should load");
    Shell::new(data, Some("1"))
}

/// Lets (paused) time move forward, then applies whatever the timers posted.
/// Returns how many events changed state.
#[allow(dead_code)]
pub async fn advance(shell: &mut Shell, rx: &mut EventReceiver, millis: u64) -> usize {
    sleep(Duration::from_millis(millis)).await;
    shell.pump(rx)
}
