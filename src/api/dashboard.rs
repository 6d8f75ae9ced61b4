//! Dashboard API - What the rendering layer talks to
//!
//! Inputs: start/stop scan, severity filter, IP search.
//! Outputs: scan state, filtered alerts, summary, and an event stream.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::FeedResult;
use crate::logic::alert::{seed_history, AlertFactory, AlertRecord};
use crate::logic::buffer::{BufferStatus, RetentionBuffer, SharedBuffer};
use crate::logic::clock::{Clock, SystemClock};
use crate::logic::config::FeedConfig;
use crate::logic::events::{FeedEvent, FeedEvents};
use crate::logic::generator::AlertGenerator;
use crate::logic::query::{self, AlertQuery, SeverityBreakdown, SeverityFilter};
use crate::logic::scan::{ScanController, ScanSession, ScanState};
use crate::logic::summary::DashboardSummary;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Everything one render needs
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub scan_state: ScanState,
    pub button_label: String,
    pub filter: AlertQuery,
    pub alerts: Vec<AlertRecord>,
    pub total_alerts: usize,
    pub breakdown: SeverityBreakdown,
    pub buffer: BufferStatus,
    pub current_scan: Option<ScanSession>,
    pub summary: DashboardSummary,
}

// ============================================================================
// DASHBOARD
// ============================================================================

pub struct Dashboard {
    controller: ScanController,
    buffer: SharedBuffer,
    events: FeedEvents,
    query: RwLock<AlertQuery>,
    summary: DashboardSummary,
}

impl Dashboard {
    /// Dashboard on the system clock with OS entropy
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        Self::with_sources(config, StdRng::from_entropy(), Arc::new(SystemClock))
    }

    /// Dashboard with injected randomness and clock
    pub fn with_sources<R>(config: FeedConfig, rng: R, clock: Arc<dyn Clock>) -> FeedResult<Self>
    where
        R: RngCore + Send + 'static,
    {
        config.validate()?;

        let history = if config.seed_history { seed_history() } else { Vec::new() };
        let buffer = RetentionBuffer::with_history(config.capacity, history)?.into_shared();

        let events = FeedEvents::new();
        let factory = AlertFactory::new(&config, clock.clone())?;
        let generator = AlertGenerator::new(factory, rng, events.clone());
        let controller =
            ScanController::new(&config, generator, buffer.clone(), events.clone(), clock)?;

        log::info!(
            "Dashboard ready (capacity: {}, seeded: {})",
            config.capacity,
            buffer.read().len()
        );

        Ok(Self {
            controller,
            buffer,
            events,
            query: RwLock::new(AlertQuery::default()),
            summary: DashboardSummary::default(),
        })
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    /// `Ok(false)` when a scan is already running
    pub fn start_scan(&self) -> FeedResult<bool> {
        self.controller.start()
    }

    pub fn stop_scan(&self) -> bool {
        self.controller.stop()
    }

    pub fn set_filter_severity(&self, severity: SeverityFilter) {
        self.query.write().severity = severity;
    }

    pub fn set_filter_severity_str(&self, raw: &str) -> FeedResult<()> {
        let severity = raw.parse()?;
        self.set_filter_severity(severity);
        Ok(())
    }

    pub fn set_search_ip(&self, needle: impl Into<String>) {
        self.query.write().ip_substring = needle.into();
    }

    pub fn reset_alerts(&self) {
        self.buffer.write().reset();
        self.events.emit(FeedEvent::FeedReset);
        log::info!("Alert feed cleared");
    }

    // ------------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------------

    pub fn scan_state(&self) -> ScanState {
        self.controller.state()
    }

    pub fn is_scanning(&self) -> bool {
        self.controller.is_scanning()
    }

    pub fn query(&self) -> AlertQuery {
        self.query.read().clone()
    }

    /// Retained alerts passing the current filters, newest first
    pub fn visible_alerts(&self) -> Vec<AlertRecord> {
        let snapshot = self.all_alerts();
        self.query.read().apply(&snapshot)
    }

    pub fn all_alerts(&self) -> Vec<AlertRecord> {
        self.buffer.read().snapshot()
    }

    pub fn severity_breakdown(&self) -> SeverityBreakdown {
        query::severity_breakdown(&self.all_alerts())
    }

    pub fn buffer_status(&self) -> BufferStatus {
        self.buffer.read().status()
    }

    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    pub fn current_scan(&self) -> Option<ScanSession> {
        self.controller.current_scan()
    }

    pub fn scan_history(&self) -> Vec<ScanSession> {
        self.controller.history()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    pub fn controller(&self) -> &ScanController {
        &self.controller
    }

    pub async fn wait_idle(&self) {
        self.controller.wait_idle().await
    }

    pub fn view(&self) -> DashboardView {
        let snapshot = self.all_alerts();
        let filter = self.query();
        let scan_state = self.scan_state();

        DashboardView {
            scan_state,
            button_label: scan_state.button_label().to_string(),
            alerts: filter.apply(&snapshot),
            filter,
            total_alerts: snapshot.len(),
            breakdown: query::severity_breakdown(&snapshot),
            buffer: self.buffer_status(),
            current_scan: self.current_scan(),
            summary: self.summary.clone(),
        }
    }
}
