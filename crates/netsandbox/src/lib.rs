//! netsandbox - ephemeral EC2 network sandbox orchestrator
//!
//! `start` builds a VPC, subnet, internet gateway, routing, security group
//! and a single instance, tagging each for later discovery. `stop` finds the
//! same resources again through those tags and removes them.

pub mod aws;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::{Dispatcher, parse_request};
pub use error::{Result, SandboxError};
