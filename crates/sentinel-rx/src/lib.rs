//! Sentinel-RX turns performance-analysis summaries into prioritized remediation
//! prescriptions and a single health score.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod telemetry;
