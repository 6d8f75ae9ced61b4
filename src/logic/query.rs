//! Alert Query - Severity and IP filtering
//!
//! Pure functions over buffer snapshots. Output keeps input order.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::logic::alert::{AlertRecord, Severity};

// ============================================================================
// SEVERITY FILTER
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl SeverityFilter {
    pub fn accepts(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::High => severity == Severity::High,
            SeverityFilter::Medium => severity == Severity::Medium,
            SeverityFilter::Low => severity == Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityFilter::All => "all",
            SeverityFilter::High => "high",
            SeverityFilter::Medium => "medium",
            SeverityFilter::Low => "low",
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(SeverityFilter::All),
            "high" => Ok(SeverityFilter::High),
            "medium" => Ok(SeverityFilter::Medium),
            "low" => Ok(SeverityFilter::Low),
            _ => Err(FeedError::InvalidFilter(s.to_string())),
        }
    }
}

impl From<Severity> for SeverityFilter {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::High => SeverityFilter::High,
            Severity::Medium => SeverityFilter::Medium,
            Severity::Low => SeverityFilter::Low,
        }
    }
}

// ============================================================================
// QUERY
// ============================================================================

/// Severity + IP substring predicate pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertQuery {
    pub severity: SeverityFilter,
    /// Empty matches everything. Case-sensitive substring of either address.
    pub ip_substring: String,
}

impl AlertQuery {
    pub fn new(severity: SeverityFilter, ip_substring: impl Into<String>) -> Self {
        Self { severity, ip_substring: ip_substring.into() }
    }

    pub fn matches(&self, alert: &AlertRecord) -> bool {
        self.severity.accepts(alert.severity())
            && (self.ip_substring.is_empty() || alert.involves_ip(&self.ip_substring))
    }

    pub fn apply(&self, snapshot: &[AlertRecord]) -> Vec<AlertRecord> {
        snapshot.iter().filter(|a| self.matches(a)).cloned().collect()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.severity == SeverityFilter::All && self.ip_substring.is_empty()
    }
}

pub fn filter(
    snapshot: &[AlertRecord],
    severity_filter: SeverityFilter,
    ip_substring: &str,
) -> Vec<AlertRecord> {
    AlertQuery::new(severity_filter, ip_substring).apply(snapshot)
}

// ============================================================================
// BREAKDOWN
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityBreakdown {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

pub fn severity_breakdown(snapshot: &[AlertRecord]) -> SeverityBreakdown {
    snapshot.iter().fold(SeverityBreakdown::default(), |mut acc, alert| {
        match alert.severity() {
            Severity::High => acc.high += 1,
            Severity::Medium => acc.medium += 1,
            Severity::Low => acc.low += 1,
        }
        acc
    })
}
