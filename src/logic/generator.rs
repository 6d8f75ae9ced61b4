//! Alert Generator - Periodic synthetic detections
//!
//! One tokio task per run. Tick k is due at `start + k * interval` and pushes
//! exactly one alert. A run may carry an end instant: ticks due after it are
//! never delivered, however late the task wakes. `stop()` is synchronous: once
//! it returns no tick lands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::RngCore;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{FeedError, FeedResult};
use crate::logic::alert::AlertFactory;
use crate::logic::buffer::SharedBuffer;
use crate::logic::events::{FeedEvent, FeedEvents};

// ============================================================================
// STATE
// ============================================================================

/// What a tick needs besides the run bookkeeping
struct TickContext {
    factory: AlertFactory,
    rng: Mutex<Box<dyn RngCore + Send>>,
    events: FeedEvents,
}

struct RunState {
    active: bool,
    started_at: Instant,
    interval: Duration,
    /// Last instant a tick may be due at
    until: Option<Instant>,
    delivered: u64,
    buffer: SharedBuffer,
}

impl RunState {
    fn next_due(&self) -> Instant {
        let k = u32::try_from(self.delivered + 1).unwrap_or(u32::MAX);
        self.started_at + self.interval * k
    }

    /// True once the next tick falls past `until`
    fn is_exhausted(&self) -> bool {
        self.until.is_some_and(|until| self.next_due() > until)
    }

    /// Deliver every tick due at or before `now`, in order, never past `until`
    fn deliver_due(&mut self, ctx: &TickContext, now: Instant) {
        let limit = self.until.map_or(now, |until| now.min(until));
        while self.active && self.next_due() <= limit {
            let alert = {
                let mut rng = ctx.rng.lock();
                ctx.factory.create(&mut **rng)
            };

            log::debug!(
                "[TICK {}] #{} {} ({}, {:.1}%) {} -> {}",
                self.delivered + 1,
                alert.id(),
                alert.kind(),
                alert.severity(),
                alert.confidence(),
                alert.source_ip(),
                alert.destination_ip()
            );

            self.buffer.write().insert(alert.clone());
            self.delivered += 1;
            ctx.events.emit(FeedEvent::AlertRaised(alert));
        }
    }
}

struct ActiveRun {
    state: Arc<Mutex<RunState>>,
    task: JoinHandle<()>,
}

// ============================================================================
// GENERATOR
// ============================================================================

pub struct AlertGenerator {
    ctx: Arc<TickContext>,
    run: Mutex<Option<ActiveRun>>,
    runs_started: AtomicU64,
    runs_stopped: AtomicU64,
    total_delivered: AtomicU64,
}

impl AlertGenerator {
    pub fn new<R>(factory: AlertFactory, rng: R, events: FeedEvents) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            ctx: Arc::new(TickContext {
                factory,
                rng: Mutex::new(Box::new(rng)),
                events,
            }),
            run: Mutex::new(None),
            runs_started: AtomicU64::new(0),
            runs_stopped: AtomicU64::new(0),
            total_delivered: AtomicU64::new(0),
        }
    }

    /// Begin periodic delivery into `buffer`. Must be called inside a Tokio runtime.
    pub fn start(&self, buffer: SharedBuffer, interval: Duration) -> FeedResult<()> {
        self.start_at(buffer, interval, Instant::now(), None)
    }

    /// Like `start`, with tick k due at `anchor + k * interval` and no tick
    /// delivered past `until`
    pub(crate) fn start_at(
        &self,
        buffer: SharedBuffer,
        interval: Duration,
        anchor: Instant,
        until: Option<Instant>,
    ) -> FeedResult<()> {
        if interval.is_zero() {
            return Err(FeedError::config("tick interval must be positive"));
        }

        let mut run = self.run.lock();
        if run.is_some() {
            return Err(FeedError::AlreadyRunning);
        }

        let handle = Handle::try_current().map_err(|_| FeedError::NoRuntime)?;

        let state = Arc::new(Mutex::new(RunState {
            active: true,
            started_at: anchor,
            interval,
            until,
            delivered: 0,
            buffer,
        }));

        let task = handle.spawn(tick_loop(state.clone(), self.ctx.clone()));
        *run = Some(ActiveRun { state, task });
        self.runs_started.fetch_add(1, Ordering::Relaxed);

        log::info!("Alert generator started (interval: {:?})", interval);
        Ok(())
    }

    /// Halt delivery. Returns the number of ticks delivered by the run that
    /// was stopped, or `None` when nothing was running.
    pub fn stop(&self) -> Option<u64> {
        let run = self.run.lock().take()?;

        let delivered = {
            let mut state = run.state.lock();
            state.deliver_due(&self.ctx, Instant::now());
            state.active = false;
            state.delivered
        };
        run.task.abort();

        self.runs_stopped.fetch_add(1, Ordering::Relaxed);
        self.total_delivered.fetch_add(delivered, Ordering::Relaxed);

        log::info!("Alert generator stopped after {} ticks", delivered);
        Some(delivered)
    }

    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }

    /// Ticks delivered by the current run so far
    pub fn current_ticks(&self) -> Option<u64> {
        self.run.lock().as_ref().map(|run| run.state.lock().delivered)
    }

    pub fn stats(&self) -> GeneratorStats {
        GeneratorStats {
            runs_started: self.runs_started.load(Ordering::Relaxed),
            runs_stopped: self.runs_stopped.load(Ordering::Relaxed),
            alerts_delivered: self.total_delivered.load(Ordering::Relaxed)
                + self.current_ticks().unwrap_or(0),
        }
    }
}

impl Drop for AlertGenerator {
    fn drop(&mut self) {
        if let Some(run) = self.run.get_mut().take() {
            run.state.lock().active = false;
            run.task.abort();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct GeneratorStats {
    pub runs_started: u64,
    pub runs_stopped: u64,
    pub alerts_delivered: u64,
}

// ============================================================================
// TICK LOOP
// ============================================================================

async fn tick_loop(state: Arc<Mutex<RunState>>, ctx: Arc<TickContext>) {
    loop {
        let due = {
            let guard = state.lock();
            if !guard.active || guard.is_exhausted() {
                break;
            }
            guard.next_due()
        };

        tokio::time::sleep_until(due).await;

        {
            let mut guard = state.lock();
            if !guard.active {
                break;
            }
            guard.deliver_due(&ctx, Instant::now());
        }
    }

    log::debug!("Tick loop exited");
}
