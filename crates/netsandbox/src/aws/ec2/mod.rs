//! EC2 client for the sandbox's network and instance resources

mod discovery;
mod instance;
mod network;
mod operations;
mod security_group;
mod types;

pub use operations::Ec2Operations;
pub use types::{LaunchInstanceConfig, VpcAttribute};

#[cfg(test)]
pub use operations::MockEc2Operations;

use crate::aws::context::AwsContext;
use crate::aws::tags::ec2_tag;
use crate::error::{Result, SandboxError};
use aws_sdk_ec2::Client;
use netsandbox_common::TagPair;
use tracing::debug;

/// EC2 client for managing sandbox resources
pub struct Ec2Client {
    pub(crate) client: Client,
}

impl Ec2Client {
    /// Create a new EC2 client (loads AWS config from environment)
    pub async fn new(region: &str) -> Self {
        let ctx = AwsContext::new(region).await;
        Self::from_context(&ctx)
    }

    /// Create an EC2 client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }

    /// Apply tags to an existing resource
    pub async fn create_tags(&self, resource_id: &str, tags: &[TagPair]) -> Result<()> {
        debug!(resource_id = %resource_id, count = tags.len(), "Tagging resource");

        self.client
            .create_tags()
            .resources(resource_id)
            .set_tags(Some(tags.iter().map(ec2_tag).collect()))
            .send()
            .await
            .map_err(|e| SandboxError::remote("CreateTags", e))?;

        Ok(())
    }
}
