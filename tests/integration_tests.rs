//! Integration tests for capwatch.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
