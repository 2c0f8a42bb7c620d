//! Deterministic cash versus partnership offer valuation for residential acquisitions.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
