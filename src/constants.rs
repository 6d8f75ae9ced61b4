//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment overrides are read in `logic::config`.

/// Retention buffer capacity (most recent alerts kept)
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

/// Tick interval between generated alerts (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 3_000;

/// Scan duration before the deadline auto-stops it (milliseconds)
pub const DEFAULT_SCAN_DURATION_MS: u64 = 15_000;

/// Confidence range for synthetic alerts (percent)
pub const DEFAULT_CONFIDENCE_MIN: f32 = 80.0;
pub const DEFAULT_CONFIDENCE_MAX: f32 = 100.0;

/// Probability that a generated alert is High (otherwise Medium)
pub const DEFAULT_HIGH_SEVERITY_PROBABILITY: f64 = 0.5;

/// Number of finished scan sessions kept for the history view
pub const DEFAULT_SESSION_HISTORY: usize = 20;

/// Capacity of the feed event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Timestamp rendering (locale independent)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generated source addresses live in 192.168.1.0/24
pub const SOURCE_NETWORK: [u8; 3] = [192, 168, 1];

/// Generated destination addresses live in 10.0.0.0/24
pub const DESTINATION_NETWORK: [u8; 3] = [10, 0, 0];

/// Highest host octet produced by the generator
pub const MAX_HOST_OCTET: u8 = 254;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "IDS Alert Feed";
