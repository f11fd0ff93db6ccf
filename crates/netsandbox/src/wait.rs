//! Fixed-interval readiness polling.
//!
//! Waits for an AWS resource to report a target state by repeatedly calling
//! a caller-supplied probe. The only cancellation is the timeout.

use crate::error::{Result, SandboxError};
use netsandbox_common::ResourceKind;
use netsandbox_common::defaults::{
    INSTANCE_POLL_INTERVAL_SECS, INSTANCE_WAIT_TIMEOUT_SECS, NETWORK_POLL_INTERVAL_SECS,
    NETWORK_WAIT_TIMEOUT_SECS,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Polling cadence and budget for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Delay between probes
    pub interval: Duration,
    /// Maximum total time to wait before timeout
    pub timeout: Duration,
}

impl WaitConfig {
    /// VPC and subnet readiness (3s / 120s)
    pub fn network() -> Self {
        Self {
            interval: Duration::from_secs(NETWORK_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(NETWORK_WAIT_TIMEOUT_SECS),
        }
    }

    /// Instance lifecycle transitions (10s / 300s)
    pub fn instance() -> Self {
        Self {
            interval: Duration::from_secs(INSTANCE_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(INSTANCE_WAIT_TIMEOUT_SECS),
        }
    }
}

/// Poll `probe` until it reports `target` (ASCII case-insensitive).
///
/// Returns on the first probe that observes the target, so the caller
/// resumes within one interval of the state change. A probe error aborts
/// the wait and is returned unchanged.
///
/// # Example
/// ```ignore
/// wait_for_state(&WaitConfig::network(), ResourceKind::Vpc, &vpc_id, "available", || {
///     ec2.vpc_state(&vpc_id)
/// })
/// .await?;
/// ```
pub async fn wait_for_state<F, Fut>(
    config: &WaitConfig,
    kind: ResourceKind,
    id: &str,
    target: &str,
    mut probe: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    while start.elapsed() < config.timeout {
        attempts += 1;
        let state = probe().await?;

        if state.eq_ignore_ascii_case(target) {
            debug!(kind = %kind, id = %id, state = %state, attempts, "Resource ready");
            return Ok(());
        }

        debug!(
            kind = %kind,
            id = %id,
            state = %state,
            target = %target,
            attempt = attempts,
            "Resource not ready, retrying"
        );
        sleep(config.interval).await;
    }

    warn!(
        kind = %kind,
        id = %id,
        target = %target,
        timeout_secs = config.timeout.as_secs(),
        attempts,
        "Timed out waiting for resource"
    );
    Err(SandboxError::Timeout {
        kind,
        id: id.to_string(),
        target: target.to_string(),
        timeout: config.timeout,
    })
}
