//! Logic Module - Feed engine
//!
//! Everything that decides what the dashboard shows. No rendering here.
//!
//! ## Layout
//! - `alert/` - AlertRecord model and factory
//! - `buffer` - bounded newest-first retention
//! - `generator` - periodic tick task
//! - `scan/` - scan lifecycle state machine
//! - `query` - severity / IP filtering

pub mod config;
pub mod clock;
pub mod events;
pub mod alert;
pub mod buffer;
pub mod generator;
pub mod scan;
pub mod query;
pub mod summary;
