//! Weighted safety-performance scoring for multi-site workplace compliance.
//!
//! Sites submit monthly target/actual pairs for a fixed catalog of safety
//! parameters. The scoring module turns those pairs into per-parameter
//! points, a weighted 0-100 total with a LOW/MEDIUM/HIGH rating, and the
//! derived industry KPI ratios (TRIR, LTIFR, near-miss rate) shown on the
//! dashboard.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
