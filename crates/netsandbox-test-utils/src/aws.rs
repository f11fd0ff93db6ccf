//! AWS test utilities
//!
//! Region detection, unique run IDs and per-run tag namespaces for
//! integration tests that talk to a real account.

use chrono::Utc;
use netsandbox_common::TagNamespace;
use netsandbox_common::defaults::DEFAULT_REGION;

/// Get the AWS region for tests.
///
/// Checks environment variables in order:
/// 1. AWS_REGION
/// 2. AWS_DEFAULT_REGION
/// 3. Falls back to the CLI default region
pub fn get_test_region() -> String {
    std::env::var("AWS_REGION")
        .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
        .unwrap_or_else(|_| DEFAULT_REGION.to_string())
}

/// Boot image for integration tests, overridable with `NETSANDBOX_TEST_AMI`.
///
/// The request default is only valid in us-east-1.
pub fn get_test_ami() -> Option<String> {
    std::env::var("NETSANDBOX_TEST_AMI").ok()
}

/// Generate a unique run ID for test resources.
///
/// Format: `test-{timestamp_ms}-{counter}`, unique even when tests start
/// in the same millisecond.
///
/// # Example
///
/// ```
/// use netsandbox_test_utils::aws::test_run_id;
///
/// let run_id = test_run_id();
/// assert!(run_id.starts_with("test-"));
/// ```
pub fn test_run_id() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let ts = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("test-{}-{}", ts, counter)
}

/// Tag namespace private to one test run.
///
/// Both the name and project values carry the run ID so a leftover sandbox
/// from an aborted run never matches a later one.
pub fn test_tag_namespace() -> TagNamespace {
    let run_id = test_run_id();
    TagNamespace {
        name_value: format!("netsandbox-{run_id}"),
        project_value: run_id,
        ..TagNamespace::default()
    }
}
