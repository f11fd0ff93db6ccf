//! EC2 types and configuration

use netsandbox_common::TagPair;

/// Configuration for launching the sandbox instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchInstanceConfig {
    /// AMI to boot
    pub ami_id: String,
    /// EC2 instance type (e.g., "t2.micro")
    pub instance_type: String,
    /// Subnet for the primary network interface
    pub subnet_id: String,
    /// Security group for the primary network interface
    pub security_group_id: String,
    /// SSH key pair name, omitted from the launch when `None`
    pub key_name: Option<String>,
    /// Placement zone, provider's choice when `None`
    pub availability_zone: Option<String>,
    /// Tags applied at launch
    pub tags: Vec<TagPair>,
}

impl LaunchInstanceConfig {
    /// Create a new launch configuration with required fields
    pub fn new(
        ami_id: impl Into<String>,
        instance_type: impl Into<String>,
        subnet_id: impl Into<String>,
        security_group_id: impl Into<String>,
    ) -> Self {
        Self {
            ami_id: ami_id.into(),
            instance_type: instance_type.into(),
            subnet_id: subnet_id.into(),
            security_group_id: security_group_id.into(),
            key_name: None,
            availability_zone: None,
            tags: Vec::new(),
        }
    }

    /// Set the SSH key pair name
    pub fn with_key_name(mut self, key_name: Option<String>) -> Self {
        self.key_name = key_name;
        self
    }

    /// Set the availability zone
    pub fn with_availability_zone(mut self, zone: Option<String>) -> Self {
        self.availability_zone = zone;
        self
    }

    /// Set the launch tags
    pub fn with_tags(mut self, tags: Vec<TagPair>) -> Self {
        self.tags = tags;
        self
    }
}

/// Boolean VPC attributes toggled during provisioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum VpcAttribute {
    #[strum(serialize = "enableDnsSupport")]
    DnsSupport,
    #[strum(serialize = "enableDnsHostnames")]
    DnsHostnames,
}
