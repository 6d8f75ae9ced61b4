//! Scan Module
//!
//! Scan lifecycle: the controller state machine plus session bookkeeping.
//!
//! ## Structure
//! - `types`: ScanState, StopReason, ScanSession
//! - `controller`: ScanController (generator + deadline ownership)
//! - `tests`: time-driven scenarios across generator, buffer and query

pub mod types;
pub mod controller;

#[cfg(test)]
mod tests;

pub use types::{ScanSession, ScanState, StopReason};
pub use controller::{ControllerStats, ScanController};
