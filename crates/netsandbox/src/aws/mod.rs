//! AWS client modules for the sandbox
//!
//! This module provides wrappers around the EC2 SDK client for:
//! - context: one loaded SDK config per invocation
//! - ec2: the network and instance calls, behind the `Ec2Operations` seam
//! - locator: tag-indexed discovery used by teardown
//! - error: classification of provider error codes

pub mod context;
pub mod ec2;
pub mod error;
pub mod locator;
pub mod tags;

pub use context::AwsContext;
pub use ec2::{Ec2Client, Ec2Operations, LaunchInstanceConfig, VpcAttribute};
pub use error::{AwsError, classify_aws_error};
pub use locator::{ResourceQuery, locate, locate_all};
