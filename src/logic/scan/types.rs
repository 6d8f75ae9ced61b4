use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Idle,
    Scanning,
}

impl ScanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Scanning => "scanning",
        }
    }

    /// Text for the scan button
    pub fn button_label(&self) -> &'static str {
        match self {
            ScanState::Idle => "Start Scan",
            ScanState::Scanning => "Scanning...",
        }
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Explicit stop from the caller
    Manual,
    /// Scan duration elapsed
    Deadline,
}

/// Bookkeeping for one Idle -> Scanning -> Idle cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSession {
    pub scan_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub alerts_generated: u64,
    pub stop_reason: Option<StopReason>,
}

impl ScanSession {
    pub fn begin(started_at: DateTime<Utc>) -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            started_at,
            ended_at: None,
            alerts_generated: 0,
            stop_reason: None,
        }
    }

    pub fn finish(&mut self, ended_at: DateTime<Utc>, alerts_generated: u64, reason: StopReason) {
        self.ended_at = Some(ended_at);
        self.alerts_generated = alerts_generated;
        self.stop_reason = Some(reason);
    }

    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }
}
