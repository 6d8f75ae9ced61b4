//! IDS Alert Feed - Core
//!
//! Simulated intrusion-detection feed: a timer-driven alert generator with a
//! scan lifecycle, bounded retention and severity / IP filtering. Rendering
//! lives elsewhere and observes this crate through `api::Dashboard`.
//!
//! ```text
//!  ScanController ──start──▶ AlertGenerator ──tick──▶ RetentionBuffer
//!        │ deadline                 │ FeedEvent            │ snapshot
//!        ▼                          ▼                      ▼
//!      stop()                  subscribers            AlertQuery::filter
//! ```

pub mod api;
pub mod constants;
pub mod error;
pub mod logic;

pub use api::{Dashboard, DashboardView};
pub use error::{FeedError, FeedResult};
pub use logic::alert::{AlertRecord, Severity, ThreatCategory};
pub use logic::config::FeedConfig;
pub use logic::events::FeedEvent;
pub use logic::query::{filter, AlertQuery, SeverityFilter};
pub use logic::scan::{ScanState, StopReason};
