// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::Once;

use anyhow::Result;
use log::{info, LevelFilter};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use mockchat::controller::{ChatController, PageConfig};
use mockchat::simulator::{ReplyRouting, SimulatorConfig, SimulatorEvent};
use mockchat::storage::ChatStore;

static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

/// Controller over a fresh in-memory store with default seed data and the
/// given reply routing
pub fn setup_controller(routing: ReplyRouting) -> (ChatController, mpsc::UnboundedReceiver<SimulatorEvent>) {
    setup_logging();
    let config = PageConfig {
        simulator: SimulatorConfig {
            routing,
            ..SimulatorConfig::default()
        },
        ..PageConfig::default()
    };
    ChatController::new(ChatStore::in_memory(), config)
}

/// Wait for the first simulator event matching the predicate
pub async fn wait_for_event(
    events_rx: &mut mpsc::UnboundedReceiver<SimulatorEvent>,
    predicate: impl Fn(&SimulatorEvent) -> bool,
    timeout_secs: u64,
) -> Result<SimulatorEvent> {
    info!("Waiting for simulator event...");
    match timeout(Duration::from_secs(timeout_secs), async {
        while let Some(event) = events_rx.recv().await {
            if predicate(&event) {
                return Ok(event);
            }
        }
        Err(anyhow::anyhow!("Event receiver closed"))
    })
    .await
    {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("Timed out waiting for simulator event")),
    }
}

/// Wait until a reply instance finishes, either stored or cancelled
pub async fn wait_for_outcome(
    events_rx: &mut mpsc::UnboundedReceiver<SimulatorEvent>,
    timeout_secs: u64,
) -> Result<SimulatorEvent> {
    wait_for_event(
        events_rx,
        |event| matches!(event, SimulatorEvent::Replied { .. } | SimulatorEvent::Cancelled { .. }),
        timeout_secs,
    )
    .await
}

/// Collect everything the simulator emits until `count` instances have finished
pub async fn collect_until_finished(
    events_rx: &mut mpsc::UnboundedReceiver<SimulatorEvent>,
    count: usize,
    timeout_secs: u64,
) -> Result<Vec<SimulatorEvent>> {
    let mut events = Vec::new();
    let mut finished = 0;
    let collected = timeout(Duration::from_secs(timeout_secs), async {
        while finished < count {
            match events_rx.recv().await {
                Some(event) => {
                    if matches!(event, SimulatorEvent::Replied { .. } | SimulatorEvent::Cancelled { .. }) {
                        finished += 1;
                    }
                    events.push(event);
                }
                None => break,
            }
        }
    })
    .await;
    if collected.is_err() {
        return Err(anyhow::anyhow!("Timed out after {} of {} instances", finished, count));
    }
    Ok(events)
}
