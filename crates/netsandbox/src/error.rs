//! Errors that abort a provisioning or teardown phase

use crate::aws::error::{AwsError, classify_sdk_error};
use aws_sdk_ec2::error::ProvideErrorMetadata;
use netsandbox_common::{RequestError, ResourceKind};
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = SandboxError> = std::result::Result<T, E>;

/// Phase-fatal errors. None of them is retried by the orchestrators.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// The provider rejected a request or reported a fault
    #[error("{operation} failed: {source}")]
    Remote {
        operation: &'static str,
        #[source]
        source: AwsError,
    },

    /// A readiness condition was never observed within budget
    #[error("{kind} {id} did not reach state '{target}' within {}s", timeout.as_secs())]
    Timeout {
        kind: ResourceKind,
        id: String,
        target: String,
        timeout: Duration,
    },

    /// The request failed validation before any remote call
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),
}

impl SandboxError {
    /// Wrap an SDK error, classifying it by its AWS error code
    pub fn remote<E>(operation: &'static str, error: E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error,
    {
        SandboxError::Remote {
            operation,
            source: classify_sdk_error(&error),
        }
    }

    /// Error for a response that lacks an expected field
    pub fn missing_field(operation: &'static str, field: &str) -> Self {
        SandboxError::Remote {
            operation,
            source: AwsError::missing_field(field),
        }
    }

    /// Error for a describe call that returned no matching resource
    pub fn not_found(operation: &'static str, message: impl Into<String>) -> Self {
        SandboxError::Remote {
            operation,
            source: AwsError::NotFound {
                message: message.into(),
            },
        }
    }

    /// Classified AWS error, if this is a remote failure
    pub fn aws_error(&self) -> Option<&AwsError> {
        match self {
            SandboxError::Remote { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Check if the provider reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.aws_error().is_some_and(AwsError::is_not_found)
    }
}

/// Turn a "not found" failure into `Ok(None)`; pass everything else through.
pub fn ignore_not_found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
