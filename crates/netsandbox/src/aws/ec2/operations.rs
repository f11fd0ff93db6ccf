//! EC2 operations trait for testing

use super::Ec2Client;
use super::types::{LaunchInstanceConfig, VpcAttribute};
use crate::aws::locator::ResourceQuery;
use crate::error::Result;
use netsandbox_common::{IngressRule, TagPair};

/// Trait for EC2 operations that can be mocked in tests.
///
/// This trait abstracts every EC2 call the orchestrators make so that the
/// provisioning and teardown chains can be unit tested without hitting AWS.
///
/// Note: Some parameters use owned `Vec`/`Option<String>` instead of slices
/// to work around mockall lifetime limitations.
#[allow(async_fn_in_trait)] // Internal use only, Send+Sync bounds on trait are sufficient
#[cfg_attr(test, mockall::automock)]
pub trait Ec2Operations: Send + Sync {
    /// Create a VPC and return its ID
    async fn create_vpc(&self, cidr_block: &str) -> Result<String>;

    /// Current state of a VPC (`pending` or `available`)
    async fn vpc_state(&self, vpc_id: &str) -> Result<String>;

    /// Turn on a boolean VPC attribute
    async fn enable_vpc_attribute(&self, vpc_id: &str, attribute: VpcAttribute) -> Result<()>;

    /// Delete a VPC
    async fn delete_vpc(&self, vpc_id: &str) -> Result<()>;

    /// Create a subnet and return its ID
    async fn create_subnet(
        &self,
        vpc_id: &str,
        cidr_block: &str,
        availability_zone: Option<String>,
    ) -> Result<String>;

    /// Current state of a subnet (`pending` or `available`)
    async fn subnet_state(&self, subnet_id: &str) -> Result<String>;

    /// Auto-assign public IPv4 addresses to instances launched in the subnet
    async fn enable_public_ip_on_launch(&self, subnet_id: &str) -> Result<()>;

    /// Delete a subnet
    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;

    /// Create an internet gateway and return its ID
    async fn create_internet_gateway(&self) -> Result<String>;

    /// Attach an internet gateway to a VPC
    async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()>;

    /// Detach an internet gateway from a VPC
    async fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()>;

    /// Delete an internet gateway
    async fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()>;

    /// Associate a route table with a subnet, returning the association ID
    async fn associate_route_table(&self, route_table_id: &str, subnet_id: &str)
    -> Result<String>;

    /// Add a route through an internet gateway
    async fn create_route(
        &self,
        route_table_id: &str,
        destination_cidr: &str,
        gateway_id: &str,
    ) -> Result<()>;

    /// Create a security group and return its ID
    async fn create_security_group(
        &self,
        group_name: &str,
        description: &str,
        vpc_id: &str,
    ) -> Result<String>;

    /// Authorize inbound rules on a security group
    async fn authorize_ingress(&self, group_id: &str, rules: Vec<IngressRule>) -> Result<()>;

    /// Delete a security group
    async fn delete_security_group(&self, group_id: &str) -> Result<()>;

    /// Launch one instance and return its ID
    async fn run_instance(&self, config: LaunchInstanceConfig) -> Result<String>;

    /// Current state of an instance (`pending`, `running`, `terminated`, ...)
    async fn instance_state(&self, instance_id: &str) -> Result<String>;

    /// Request termination of an instance
    async fn terminate_instance(&self, instance_id: &str) -> Result<()>;

    /// Apply tags to an existing resource
    async fn create_tags(&self, resource_id: &str, tags: Vec<TagPair>) -> Result<()>;

    /// IDs of every resource matching a query, in provider order
    async fn find_ids(&self, query: &ResourceQuery) -> Result<Vec<String>>;
}

impl Ec2Operations for Ec2Client {
    async fn create_vpc(&self, cidr_block: &str) -> Result<String> {
        Ec2Client::create_vpc(self, cidr_block).await
    }

    async fn vpc_state(&self, vpc_id: &str) -> Result<String> {
        Ec2Client::vpc_state(self, vpc_id).await
    }

    async fn enable_vpc_attribute(&self, vpc_id: &str, attribute: VpcAttribute) -> Result<()> {
        Ec2Client::enable_vpc_attribute(self, vpc_id, attribute).await
    }

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        Ec2Client::delete_vpc(self, vpc_id).await
    }

    async fn create_subnet(
        &self,
        vpc_id: &str,
        cidr_block: &str,
        availability_zone: Option<String>,
    ) -> Result<String> {
        Ec2Client::create_subnet(self, vpc_id, cidr_block, availability_zone.as_deref()).await
    }

    async fn subnet_state(&self, subnet_id: &str) -> Result<String> {
        Ec2Client::subnet_state(self, subnet_id).await
    }

    async fn enable_public_ip_on_launch(&self, subnet_id: &str) -> Result<()> {
        Ec2Client::enable_public_ip_on_launch(self, subnet_id).await
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        Ec2Client::delete_subnet(self, subnet_id).await
    }

    async fn create_internet_gateway(&self) -> Result<String> {
        Ec2Client::create_internet_gateway(self).await
    }

    async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        Ec2Client::attach_internet_gateway(self, gateway_id, vpc_id).await
    }

    async fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        Ec2Client::detach_internet_gateway(self, gateway_id, vpc_id).await
    }

    async fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()> {
        Ec2Client::delete_internet_gateway(self, gateway_id).await
    }

    async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> Result<String> {
        Ec2Client::associate_route_table(self, route_table_id, subnet_id).await
    }

    async fn create_route(
        &self,
        route_table_id: &str,
        destination_cidr: &str,
        gateway_id: &str,
    ) -> Result<()> {
        Ec2Client::create_route(self, route_table_id, destination_cidr, gateway_id).await
    }

    async fn create_security_group(
        &self,
        group_name: &str,
        description: &str,
        vpc_id: &str,
    ) -> Result<String> {
        Ec2Client::create_security_group(self, group_name, description, vpc_id).await
    }

    async fn authorize_ingress(&self, group_id: &str, rules: Vec<IngressRule>) -> Result<()> {
        Ec2Client::authorize_ingress(self, group_id, &rules).await
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        Ec2Client::delete_security_group(self, group_id).await
    }

    async fn run_instance(&self, config: LaunchInstanceConfig) -> Result<String> {
        Ec2Client::run_instance(self, config).await
    }

    async fn instance_state(&self, instance_id: &str) -> Result<String> {
        Ec2Client::instance_state(self, instance_id).await
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        Ec2Client::terminate_instance(self, instance_id).await
    }

    async fn create_tags(&self, resource_id: &str, tags: Vec<TagPair>) -> Result<()> {
        Ec2Client::create_tags(self, resource_id, &tags).await
    }

    async fn find_ids(&self, query: &ResourceQuery) -> Result<Vec<String>> {
        Ec2Client::find_ids(self, query).await
    }
}
