//! Scan Controller - Idle/Scanning lifecycle
//!
//! Owns the generator and the one-shot deadline task. Double start and stop
//! while idle are no-ops; a deadline left over from an earlier scan can never
//! stop a later one.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use super::types::{ScanSession, ScanState, StopReason};
use crate::error::{FeedError, FeedResult};
use crate::logic::buffer::SharedBuffer;
use crate::logic::clock::Clock;
use crate::logic::config::FeedConfig;
use crate::logic::events::{FeedEvent, FeedEvents};
use crate::logic::generator::{AlertGenerator, GeneratorStats};

// ============================================================================
// STATE
// ============================================================================

struct ActiveScan {
    session: ScanSession,
    deadline: JoinHandle<()>,
}

#[derive(Default)]
struct ControllerState {
    current: Option<ActiveScan>,
    /// Finished sessions, newest first
    history: VecDeque<ScanSession>,
    stats: ControllerStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControllerStats {
    pub scans_started: u64,
    pub deadlines_armed: u64,
    pub manual_stops: u64,
    pub auto_stops: u64,
}

struct Inner {
    generator: AlertGenerator,
    buffer: SharedBuffer,
    events: FeedEvents,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    scan_duration: Duration,
    session_history: usize,
    state: Mutex<ControllerState>,
    state_tx: watch::Sender<ScanState>,
}

// ============================================================================
// CONTROLLER
// ============================================================================

/// Cheap to clone; clones drive the same scan
#[derive(Clone)]
pub struct ScanController {
    inner: Arc<Inner>,
}

impl ScanController {
    pub fn new(
        config: &FeedConfig,
        generator: AlertGenerator,
        buffer: SharedBuffer,
        events: FeedEvents,
        clock: Arc<dyn Clock>,
    ) -> FeedResult<Self> {
        config.validate()?;

        let (state_tx, _) = watch::channel(ScanState::Idle);

        Ok(Self {
            inner: Arc::new(Inner {
                generator,
                buffer,
                events,
                clock,
                tick_interval: config.tick_interval,
                scan_duration: config.scan_duration,
                session_history: config.session_history,
                state: Mutex::new(ControllerState::default()),
                state_tx,
            }),
        })
    }

    /// Idle -> Scanning. `Ok(false)` when a scan is already running.
    pub fn start(&self) -> FeedResult<bool> {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        if let Some(active) = &state.current {
            log::debug!("Scan {} already running, start ignored", active.session.scan_id);
            return Ok(false);
        }

        let anchor = Instant::now();
        let deadline_at = anchor + inner.scan_duration;
        match inner.generator.start_at(
            inner.buffer.clone(),
            inner.tick_interval,
            anchor,
            Some(deadline_at),
        ) {
            Ok(()) => {}
            Err(FeedError::AlreadyRunning) => {
                log::warn!("Generator already running without an active scan, start ignored");
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        let session = ScanSession::begin(inner.clock.now());
        let scan_id = session.scan_id;
        let deadline = tokio::spawn(deadline_task(
            Arc::downgrade(&self.inner),
            scan_id,
            deadline_at,
        ));

        state.current = Some(ActiveScan { session, deadline });
        state.stats.scans_started += 1;
        state.stats.deadlines_armed += 1;
        drop(state);

        inner.state_tx.send_replace(ScanState::Scanning);
        inner.events.emit(FeedEvent::ScanStarted { scan_id });

        log::info!(
            "Scan {} started (interval: {:?}, duration: {:?})",
            scan_id,
            inner.tick_interval,
            inner.scan_duration
        );
        Ok(true)
    }

    /// Scanning -> Idle. `false` when already idle.
    pub fn stop(&self) -> bool {
        self.inner.finish(None, StopReason::Manual)
    }

    pub fn state(&self) -> ScanState {
        if self.inner.state.lock().current.is_some() {
            ScanState::Scanning
        } else {
            ScanState::Idle
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.state() == ScanState::Scanning
    }

    /// Running session with its live alert count
    pub fn current_scan(&self) -> Option<ScanSession> {
        let state = self.inner.state.lock();
        let active = state.current.as_ref()?;
        let mut session = active.session.clone();
        session.alerts_generated = self.inner.generator.current_ticks().unwrap_or(0);
        Some(session)
    }

    /// Finished sessions, newest first
    pub fn history(&self) -> Vec<ScanSession> {
        self.inner.state.lock().history.iter().cloned().collect()
    }

    pub fn stats(&self) -> ControllerStats {
        self.inner.state.lock().stats
    }

    pub fn generator_stats(&self) -> GeneratorStats {
        self.inner.generator.stats()
    }

    /// Watch channel that flips on every transition
    pub fn watch_state(&self) -> watch::Receiver<ScanState> {
        self.inner.state_tx.subscribe()
    }

    /// Resolves once the controller is idle
    pub async fn wait_idle(&self) {
        let mut rx = self.watch_state();
        // The sender lives as long as `self`, so this cannot fail
        let _ = rx.wait_for(|state| *state == ScanState::Idle).await;
    }
}

impl Inner {
    /// Shared stop path. `expected` pins the scan a deadline was armed for.
    fn finish(&self, expected: Option<Uuid>, reason: StopReason) -> bool {
        let mut state = self.state.lock();

        let is_target = match (&state.current, expected) {
            (Some(active), Some(id)) => active.session.scan_id == id,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !is_target {
            log::debug!("Stop ({:?}) ignored, no matching scan", reason);
            return false;
        }

        let Some(active) = state.current.take() else {
            return false;
        };
        if reason == StopReason::Manual {
            active.deadline.abort();
        }

        let delivered = self.generator.stop().unwrap_or(0);

        let mut session = active.session;
        session.finish(self.clock.now(), delivered, reason);

        state.history.push_front(session.clone());
        state.history.truncate(self.session_history);
        match reason {
            StopReason::Manual => state.stats.manual_stops += 1,
            StopReason::Deadline => state.stats.auto_stops += 1,
        }
        drop(state);

        log::info!(
            "Scan {} stopped ({:?}), {} alerts generated",
            session.scan_id,
            reason,
            delivered
        );
        self.events.emit(FeedEvent::ScanStopped { session, reason });
        self.state_tx.send_replace(ScanState::Idle);
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(active) = self.state.get_mut().current.take() {
            active.deadline.abort();
        }
    }
}

async fn deadline_task(inner: Weak<Inner>, scan_id: Uuid, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;

    if let Some(inner) = inner.upgrade() {
        log::debug!("Scan {} deadline reached", scan_id);
        inner.finish(Some(scan_id), StopReason::Deadline);
    }
}
