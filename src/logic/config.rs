//! Feed Configuration
//!
//! Tunables for the alert feed. Defaults come from `constants`, every field
//! can be overridden from the environment (or a `.env` file loaded in main).

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{FeedError, FeedResult};
use crate::logic::alert::ThreatCategory;

// ============================================================================
// FEED CONFIG
// ============================================================================

/// Alert feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Retention buffer capacity
    pub capacity: usize,
    /// Time between two generated alerts
    pub tick_interval: Duration,
    /// Scan length before the deadline stops it
    pub scan_duration: Duration,
    /// Lower bound of generated confidence (percent)
    pub confidence_min: f32,
    /// Upper bound of generated confidence (percent)
    pub confidence_max: f32,
    /// Categories the generator draws from (uniformly)
    pub categories: Vec<ThreatCategory>,
    /// Probability of High severity, Medium otherwise
    pub high_severity_probability: f64,
    /// Start with the historical seed alerts in the buffer
    pub seed_history: bool,
    /// Finished scan sessions kept by the controller
    pub session_history: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUFFER_CAPACITY,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            scan_duration: Duration::from_millis(DEFAULT_SCAN_DURATION_MS),
            confidence_min: DEFAULT_CONFIDENCE_MIN,
            confidence_max: DEFAULT_CONFIDENCE_MAX,
            categories: ThreatCategory::live_defaults(),
            high_severity_probability: DEFAULT_HIGH_SEVERITY_PROBABILITY,
            seed_history: true,
            session_history: DEFAULT_SESSION_HISTORY,
        }
    }
}

impl FeedConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            capacity: env_parse("IDS_FEED_CAPACITY").unwrap_or(defaults.capacity),
            tick_interval: env_parse("IDS_TICK_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            scan_duration: env_parse("IDS_SCAN_DURATION_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.scan_duration),
            confidence_min: env_parse("IDS_CONFIDENCE_MIN").unwrap_or(defaults.confidence_min),
            confidence_max: env_parse("IDS_CONFIDENCE_MAX").unwrap_or(defaults.confidence_max),
            categories: env::var("IDS_CATEGORIES")
                .ok()
                .map(|s| parse_categories(&s))
                .unwrap_or(defaults.categories),
            high_severity_probability: env_parse("IDS_HIGH_SEVERITY_PROBABILITY")
                .unwrap_or(defaults.high_severity_probability),
            seed_history: env::var("IDS_SEED_HISTORY")
                .map(|s| s.to_lowercase() != "false" && s != "0")
                .unwrap_or(defaults.seed_history),
            session_history: env_parse("IDS_SESSION_HISTORY").unwrap_or(defaults.session_history),
        }
    }

    /// Fast profile for demos: 1s ticks over a 3s scan
    pub fn quick() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            scan_duration: Duration::from_secs(3),
            ..Default::default()
        }
    }

    /// Reject settings that can only come from a programming mistake
    pub fn validate(&self) -> FeedResult<()> {
        if self.capacity == 0 {
            return Err(FeedError::config("buffer capacity must be at least 1"));
        }
        if self.tick_interval.is_zero() {
            return Err(FeedError::config("tick interval must be positive"));
        }
        if self.scan_duration.is_zero() {
            return Err(FeedError::config("scan duration must be positive"));
        }
        if !self.confidence_min.is_finite() || !self.confidence_max.is_finite() {
            return Err(FeedError::config("confidence bounds must be finite"));
        }
        if self.confidence_min < 0.0 || self.confidence_max > 100.0 {
            return Err(FeedError::config(format!(
                "confidence range [{}, {}] outside [0, 100]",
                self.confidence_min, self.confidence_max
            )));
        }
        if self.confidence_min > self.confidence_max {
            return Err(FeedError::config(format!(
                "confidence min {} above max {}",
                self.confidence_min, self.confidence_max
            )));
        }
        if !(0.0..=1.0).contains(&self.high_severity_probability) {
            return Err(FeedError::config(format!(
                "high severity probability {} outside [0, 1]",
                self.high_severity_probability
            )));
        }
        if self.categories.is_empty() {
            return Err(FeedError::config("category set is empty"));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_categories(raw: &str) -> Vec<ThreatCategory> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ThreatCategory::from_label)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.capacity, 10);
        assert_eq!(config.tick_interval, Duration::from_secs(3));
        assert_eq!(config.scan_duration, Duration::from_secs(15));
        assert_eq!(config.confidence_min, 80.0);
        assert_eq!(config.confidence_max, 100.0);
        assert_eq!(config.high_severity_probability, 0.5);
        assert!(config.seed_history);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quick_config() {
        let config = FeedConfig::quick();
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.scan_duration, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reject_zero_capacity() {
        let config = FeedConfig { capacity: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(FeedError::InvalidConfig(_))));
    }

    #[test]
    fn test_reject_zero_interval_and_duration() {
        let config = FeedConfig { tick_interval: Duration::ZERO, ..Default::default() };
        assert!(config.validate().is_err());

        let config = FeedConfig { scan_duration: Duration::ZERO, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_bad_confidence_range() {
        let inverted = FeedConfig { confidence_min: 95.0, confidence_max: 90.0, ..Default::default() };
        assert!(inverted.validate().is_err());

        let too_high = FeedConfig { confidence_max: 120.0, ..Default::default() };
        assert!(too_high.validate().is_err());

        let nan = FeedConfig { confidence_min: f32::NAN, ..Default::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_reject_bad_probability_and_categories() {
        let config = FeedConfig { high_severity_probability: 1.5, ..Default::default() };
        assert!(config.validate().is_err());

        let config = FeedConfig { categories: vec![], ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_categories() {
        let parsed = parse_categories("XSS Attack, Port Scanning ,,Crypto Mining");
        assert_eq!(
            parsed,
            vec![
                ThreatCategory::XssAttack,
                ThreatCategory::PortScanning,
                ThreatCategory::Other("Crypto Mining".to_string()),
            ]
        );
    }
}
