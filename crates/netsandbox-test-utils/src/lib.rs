//! Shared test utilities for netsandbox
//!
//! This crate provides helpers for integration tests that run against a real
//! AWS account.
//!
//! ## Modules
//!
//! - [`aws`]: Region detection, run IDs and per-run tag namespaces

pub mod aws;

// Re-export commonly used items
pub use aws::{get_test_ami, get_test_region, test_run_id, test_tag_namespace};
