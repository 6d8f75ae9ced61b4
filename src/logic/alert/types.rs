//! Alert Types
//!
//! Core types for synthetic detections.
//! No generation logic here - data structures only.

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TIMESTAMP_FORMAT;

/// Process-wide alert id sequence
static NEXT_ALERT_ID: AtomicU64 = AtomicU64::new(1);

fn next_alert_id() -> u64 {
    NEXT_ALERT_ID.fetch_add(1, Ordering::Relaxed)
}

// ============================================================================
// THREAT CATEGORY
// ============================================================================

/// Detected attack category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ThreatCategory {
    SqlInjection,
    BruteForce,
    XssAttack,
    DirectoryTraversal,
    FileInclusion,
    DdosAttempt,
    PortScanning,
    /// Category outside the built-in set
    Other(String),
}

impl ThreatCategory {
    /// Categories produced by live scans
    pub fn live_defaults() -> Vec<ThreatCategory> {
        vec![
            ThreatCategory::SqlInjection,
            ThreatCategory::BruteForce,
            ThreatCategory::XssAttack,
            ThreatCategory::DirectoryTraversal,
            ThreatCategory::FileInclusion,
        ]
    }

    /// Every built-in category
    pub fn builtin() -> Vec<ThreatCategory> {
        let mut all = Self::live_defaults();
        all.push(ThreatCategory::DdosAttempt);
        all.push(ThreatCategory::PortScanning);
        all
    }

    pub fn label(&self) -> &str {
        match self {
            ThreatCategory::SqlInjection => "SQL Injection Attempt",
            ThreatCategory::BruteForce => "Brute Force Attack",
            ThreatCategory::XssAttack => "XSS Attack",
            ThreatCategory::DirectoryTraversal => "Directory Traversal",
            ThreatCategory::FileInclusion => "File Inclusion Attempt",
            ThreatCategory::DdosAttempt => "DDoS Attack Attempt",
            ThreatCategory::PortScanning => "Port Scanning",
            ThreatCategory::Other(name) => name,
        }
    }

    /// Map a display label back to a category (unknown labels become `Other`)
    pub fn from_label(label: &str) -> ThreatCategory {
        Self::builtin()
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
            .unwrap_or_else(|| ThreatCategory::Other(label.to_string()))
    }
}

impl std::fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<ThreatCategory> for String {
    fn from(category: ThreatCategory) -> Self {
        category.label().to_string()
    }
}

impl From<String> for ThreatCategory {
    fn from(label: String) -> Self {
        ThreatCategory::from_label(&label)
    }
}

// ============================================================================
// SEVERITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    /// Only carried by historical records, never generated live
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERT RECORD
// ============================================================================

/// One detected event. Immutable once built.
///
/// Deserializing goes through `historical`: an incoming `id` is ignored and
/// confidence is clamped like any other record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ImportedAlert")]
pub struct AlertRecord {
    id: u64,
    #[serde(rename = "type")]
    kind: ThreatCategory,
    severity: Severity,
    confidence: f32,
    #[serde(rename = "sourceIP")]
    source_ip: Ipv4Addr,
    #[serde(rename = "destinationIP")]
    destination_ip: Ipv4Addr,
    #[serde(with = "fixed_timestamp")]
    timestamp: DateTime<Utc>,
}

impl AlertRecord {
    pub(crate) fn new(
        kind: ThreatCategory,
        severity: Severity,
        confidence: f32,
        source_ip: Ipv4Addr,
        destination_ip: Ipv4Addr,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: next_alert_id(),
            kind,
            severity,
            confidence: round_confidence(confidence),
            source_ip,
            destination_ip,
            timestamp,
        }
    }

    /// Build a record with explicit values (seed data, imported history).
    /// This is the only path that can produce `Severity::Low`.
    pub fn historical(
        kind: ThreatCategory,
        severity: Severity,
        confidence: f32,
        source_ip: Ipv4Addr,
        destination_ip: Ipv4Addr,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(kind, severity, confidence, source_ip, destination_ip, timestamp)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &ThreatCategory {
        &self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn source_ip(&self) -> Ipv4Addr {
        self.source_ip
    }

    pub fn destination_ip(&self) -> Ipv4Addr {
        self.destination_ip
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Timestamp in the fixed `YYYY-MM-DD HH:MM:SS` form
    pub fn timestamp_display(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// True when `needle` occurs in the dotted-quad source or destination
    pub fn involves_ip(&self, needle: &str) -> bool {
        self.source_ip.to_string().contains(needle)
            || self.destination_ip.to_string().contains(needle)
    }
}

/// Wire form accepted when importing history
#[derive(Deserialize)]
struct ImportedAlert {
    #[serde(rename = "type")]
    kind: ThreatCategory,
    severity: Severity,
    confidence: f32,
    #[serde(rename = "sourceIP")]
    source_ip: Ipv4Addr,
    #[serde(rename = "destinationIP")]
    destination_ip: Ipv4Addr,
    #[serde(with = "fixed_timestamp")]
    timestamp: DateTime<Utc>,
}

impl From<ImportedAlert> for AlertRecord {
    fn from(raw: ImportedAlert) -> Self {
        Self::historical(
            raw.kind,
            raw.severity,
            raw.confidence,
            raw.source_ip,
            raw.destination_ip,
            raw.timestamp,
        )
    }
}

/// Clamp to [0, 100] and keep one decimal
fn round_confidence(value: f32) -> f32 {
    let clamped = if value.is_finite() { value.clamp(0.0, 100.0) } else { 0.0 };
    (clamped * 10.0).round() / 10.0
}

mod fixed_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
