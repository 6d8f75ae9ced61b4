//! Alert Factory
//!
//! Builds synthetic alerts from an injected randomness source and clock.

use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;

use super::types::{AlertRecord, Severity, ThreatCategory};
use crate::constants::{DESTINATION_NETWORK, MAX_HOST_OCTET, SOURCE_NETWORK};
use crate::error::FeedResult;
use crate::logic::clock::{Clock, SystemClock};
use crate::logic::config::FeedConfig;

pub struct AlertFactory {
    categories: Vec<ThreatCategory>,
    confidence_min: f32,
    confidence_max: f32,
    high_severity_probability: f64,
    clock: Arc<dyn Clock>,
}

impl AlertFactory {
    /// Validates `config` so `create` can never fail
    pub fn new(config: &FeedConfig, clock: Arc<dyn Clock>) -> FeedResult<Self> {
        config.validate()?;

        Ok(Self {
            categories: config.categories.clone(),
            confidence_min: config.confidence_min,
            confidence_max: config.confidence_max,
            high_severity_probability: config.high_severity_probability,
            clock,
        })
    }

    pub fn with_system_clock(config: &FeedConfig) -> FeedResult<Self> {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Draw one alert
    pub fn create<R: Rng + ?Sized>(&self, rng: &mut R) -> AlertRecord {
        let kind = self.categories[rng.gen_range(0..self.categories.len())].clone();

        let severity = if rng.gen_bool(self.high_severity_probability) {
            Severity::High
        } else {
            Severity::Medium
        };

        let confidence = rng.gen_range(self.confidence_min..=self.confidence_max);
        let source_ip = host_in(SOURCE_NETWORK, rng);
        let destination_ip = host_in(DESTINATION_NETWORK, rng);

        AlertRecord::new(kind, severity, confidence, source_ip, destination_ip, self.clock.now())
    }
}

fn host_in<R: Rng + ?Sized>(network: [u8; 3], rng: &mut R) -> Ipv4Addr {
    let [a, b, c] = network;
    Ipv4Addr::new(a, b, c, rng.gen_range(0..=MAX_HOST_OCTET))
}

// ============================================================================
// SEED HISTORY
// ============================================================================

/// Alerts shown before any scan ran, newest first
pub fn seed_history() -> Vec<AlertRecord> {
    // Fixed in-range UTC times: `single()` always holds, UTC has no gaps or folds
    let at = |h, m, s| {
        Utc.with_ymd_and_hms(2024, 10, 30, h, m, s)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH)
    };

    vec![
        AlertRecord::historical(
            ThreatCategory::DdosAttempt,
            Severity::High,
            98.5,
            Ipv4Addr::new(192, 168, 1, 105),
            Ipv4Addr::new(10, 0, 0, 1),
            at(10, 15, 23),
        ),
        AlertRecord::historical(
            ThreatCategory::PortScanning,
            Severity::Medium,
            85.2,
            Ipv4Addr::new(192, 168, 1, 110),
            Ipv4Addr::new(10, 0, 0, 2),
            at(10, 14, 55),
        ),
    ]
}
