//! The two phases of a sandbox's life
//!
//! - [`provision`]: `start`, creating the chain of network resources and the instance
//! - [`teardown`]: `stop`, rediscovering the same resources by tag and removing them

pub mod provision;
pub mod teardown;

pub use provision::{ProvisionedSandbox, Provisioner};
pub use teardown::{Teardown, TeardownReport};
