//! Scan Scenarios
//!
//! Generator + controller + buffer + query driven on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;

use crate::logic::alert::{AlertFactory, AlertRecord, Severity};
use crate::logic::buffer::{RetentionBuffer, SharedBuffer};
use crate::logic::clock::{Clock, ManualClock};
use crate::logic::config::FeedConfig;
use crate::logic::events::{FeedEvent, FeedEvents};
use crate::logic::generator::AlertGenerator;
use crate::logic::query::{filter, SeverityFilter};
use crate::logic::scan::{ScanController, ScanState, StopReason};

struct Harness {
    controller: ScanController,
    buffer: SharedBuffer,
    events: FeedEvents,
}

fn harness(config: &FeedConfig, seed: u64) -> Harness {
    let start = Utc.with_ymd_and_hms(2024, 10, 30, 9, 0, 0).unwrap();
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(start));
    let events = FeedEvents::new();
    let factory = AlertFactory::new(config, clock.clone()).unwrap();
    let generator = AlertGenerator::new(factory, StdRng::seed_from_u64(seed), events.clone());
    let buffer = RetentionBuffer::new(config.capacity).unwrap().into_shared();
    let controller =
        ScanController::new(config, generator, buffer.clone(), events.clone(), clock).unwrap();

    Harness { controller, buffer, events }
}

fn scenario_config() -> FeedConfig {
    FeedConfig {
        capacity: 10,
        tick_interval: Duration::from_secs(1),
        scan_duration: Duration::from_secs(3),
        seed_history: false,
        ..Default::default()
    }
}

/// interval 1, duration 3, capacity 10: three alerts, idle at t=3, then silence
#[tokio::test(start_paused = true)]
async fn test_end_to_end_scan() {
    let h = harness(&scenario_config(), 17);
    let t0 = Instant::now();

    assert_eq!(h.controller.start(), Ok(true));
    h.controller.wait_idle().await;

    let elapsed = t0.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_millis(3_010));
    assert_eq!(h.controller.state(), ScanState::Idle);
    assert_eq!(h.buffer.read().len(), 3);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(h.buffer.read().len(), 3);

    let session = &h.controller.history()[0];
    assert_eq!(session.alerts_generated, 3);
    assert_eq!(session.stop_reason, Some(StopReason::Deadline));
}

/// A wakeup long after the deadline still yields exactly the ticks inside the scan
#[tokio::test(start_paused = true)]
async fn test_late_wakeup_does_not_overrun_deadline() {
    let h = harness(&scenario_config(), 17);

    assert_eq!(h.controller.start(), Ok(true));
    tokio::time::advance(Duration::from_secs(10)).await;
    h.controller.wait_idle().await;

    assert_eq!(h.controller.state(), ScanState::Idle);
    assert_eq!(h.buffer.read().len(), 3);

    let session = &h.controller.history()[0];
    assert_eq!(session.alerts_generated, 3);
    assert_eq!(session.stop_reason, Some(StopReason::Deadline));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(h.buffer.read().len(), 3);
    assert_eq!(h.controller.generator_stats().alerts_delivered, 3);
}

#[tokio::test(start_paused = true)]
async fn test_alert_count_tracks_time() {
    let h = harness(&scenario_config(), 17);
    h.controller.start().unwrap();

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(h.buffer.read().len(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(h.buffer.read().len(), 2);
    assert!(h.controller.is_scanning());

    h.controller.wait_idle().await;
    assert_eq!(h.buffer.read().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_same_seed_same_feed() {
    let a = harness(&scenario_config(), 99);
    let b = harness(&scenario_config(), 99);

    a.controller.start().unwrap();
    b.controller.start().unwrap();
    a.controller.wait_idle().await;
    b.controller.wait_idle().await;

    let key = |r: &AlertRecord| {
        (r.kind().clone(), r.severity(), r.confidence(), r.source_ip(), r.destination_ip())
    };
    let left: Vec<_> = a.buffer.read().snapshot().iter().map(key).collect();
    let right: Vec<_> = b.buffer.read().snapshot().iter().map(key).collect();
    assert_eq!(left, right);
}

#[tokio::test(start_paused = true)]
async fn test_pushes_strictly_ordered() {
    let config = FeedConfig { capacity: 50, ..scenario_config() };
    let h = harness(&FeedConfig { scan_duration: Duration::from_secs(20), ..config }, 4);
    let mut rx = h.events.subscribe();

    h.controller.start().unwrap();
    h.controller.wait_idle().await;

    let snapshot = h.buffer.read().snapshot();
    assert_eq!(snapshot.len(), 20);
    assert!(snapshot.windows(2).all(|w| w[0].id() > w[1].id()));

    let mut raised = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let FeedEvent::AlertRaised(alert) = event {
            raised.push(alert.id());
        }
    }
    let mut newest_first = raised.clone();
    newest_first.reverse();
    assert_eq!(newest_first, snapshot.iter().map(|a| a.id()).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_manual_stop_mid_scan() {
    let config = FeedConfig { scan_duration: Duration::from_secs(10), ..scenario_config() };
    let h = harness(&config, 8);

    h.controller.start().unwrap();
    tokio::time::sleep(Duration::from_millis(4_500)).await;
    assert!(h.controller.stop());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.buffer.read().len(), 4);
    assert_eq!(h.controller.stats().auto_stops, 0);
    assert_eq!(h.controller.history()[0].stop_reason, Some(StopReason::Manual));
}

#[tokio::test(start_paused = true)]
async fn test_lifecycle_events() {
    let h = harness(&scenario_config(), 1);
    let mut rx = h.events.subscribe();

    h.controller.start().unwrap();
    h.controller.wait_idle().await;

    let names: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.name())
        .collect();
    assert_eq!(
        names,
        vec!["scan:started", "feed:alert", "feed:alert", "feed:alert", "scan:stopped"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_query_over_live_feed() {
    let h = harness(&FeedConfig { capacity: 10, ..scenario_config() }, 21);
    h.controller.start().unwrap();
    h.controller.wait_idle().await;

    let snapshot = h.buffer.read().snapshot();
    let high = filter(&snapshot, SeverityFilter::High, "");
    let medium = filter(&snapshot, SeverityFilter::Medium, "");
    assert_eq!(high.len() + medium.len(), snapshot.len());
    assert!(high.iter().all(|a| a.severity() == Severity::High));
    assert!(filter(&snapshot, SeverityFilter::Low, "").is_empty());
    assert_eq!(filter(&snapshot, SeverityFilter::All, "10.0.0.").len(), snapshot.len());
}
