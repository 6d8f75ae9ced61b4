//! API Module
//!
//! Surface exposed to the rendering layer.
//!
//! Structure:
//! - dashboard.rs: Dashboard facade + DashboardView

pub mod dashboard;

pub use dashboard::{Dashboard, DashboardView};
