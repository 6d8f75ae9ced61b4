//! Alert Module
//!
//! Synthetic detection records and the factory that draws them.
//!
//! ## Structure
//! - `types`: AlertRecord, ThreatCategory, Severity
//! - `factory`: random generation + seed history

pub mod types;
pub mod factory;

pub use types::{AlertRecord, Severity, ThreatCategory};
pub use factory::{seed_history, AlertFactory};
