//! Compliance mapping ingest and reporting.
//!
//! Loads a control mapping CSV, validates and normalizes it, summarizes
//! control status and evidence per framework, and exports the results.

pub mod config;
pub mod controls;
pub mod error;
pub mod report;
pub mod telemetry;
