//! Dashboard Summary
//!
//! Fixed model metrics and traffic mix shown next to the feed.
//! Display values only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetric {
    pub label: String,
    /// Percent
    pub value: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficBucket {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub metrics: Vec<ModelMetric>,
    pub traffic: Vec<TrafficBucket>,
}

impl DashboardSummary {
    pub fn total_traffic(&self) -> u64 {
        self.traffic.iter().map(|b| b.value).sum()
    }
}

impl Default for DashboardSummary {
    fn default() -> Self {
        let metric = |label: &str, value| ModelMetric { label: label.to_string(), value };
        let bucket = |name: &str, value| TrafficBucket { name: name.to_string(), value };

        Self {
            metrics: vec![
                metric("Accuracy", 95.2),
                metric("Precision", 92.8),
                metric("Recall", 89.5),
                metric("F1 Score", 90.1),
            ],
            traffic: vec![
                bucket("Normal", 2450),
                bucket("Suspicious", 150),
                bucket("Malicious", 50),
            ],
        }
    }
}
