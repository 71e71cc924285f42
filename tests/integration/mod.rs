//! Integration tests for capwatch.
//!
//! All tests run against the in-crate mock query service; no live query
//! service is required.

pub mod config_test;
pub mod dashboard_test;
pub mod headless_test;
pub mod runner_test;
