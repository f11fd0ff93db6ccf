//! EC2 instance lifecycle operations

use super::Ec2Client;
use super::types::LaunchInstanceConfig;
use crate::aws::tags::ec2_tag_spec;
use crate::error::{Result, SandboxError};
use aws_sdk_ec2::types::{
    InstanceNetworkInterfaceSpecification, InstanceType, Placement, ResourceType,
};
use tracing::info;

impl Ec2Client {
    /// Launch a single instance on a fresh primary network interface.
    ///
    /// The interface is placed in the configured subnet with the configured
    /// security group and a public IPv4 address.
    pub async fn run_instance(&self, config: LaunchInstanceConfig) -> Result<String> {
        info!(
            ami = %config.ami_id,
            instance_type = %config.instance_type,
            subnet_id = %config.subnet_id,
            key_name = ?config.key_name,
            "Launching instance"
        );

        let interface = InstanceNetworkInterfaceSpecification::builder()
            .device_index(0)
            .subnet_id(&config.subnet_id)
            .associate_public_ip_address(true)
            .groups(&config.security_group_id)
            .build();

        let mut request = self
            .client
            .run_instances()
            .image_id(&config.ami_id)
            .instance_type(InstanceType::from(config.instance_type.as_str()))
            .min_count(1)
            .max_count(1)
            .network_interfaces(interface)
            .set_key_name(config.key_name.clone())
            .tag_specifications(ec2_tag_spec(ResourceType::Instance, &config.tags));

        if let Some(zone) = &config.availability_zone {
            request = request.placement(Placement::builder().availability_zone(zone).build());
        }

        let response = request
            .send()
            .await
            .map_err(|e| SandboxError::remote("RunInstances", e))?;

        let instance_id = response
            .instances()
            .first()
            .and_then(|i| i.instance_id())
            .ok_or_else(|| SandboxError::missing_field("RunInstances", "instance ID"))?
            .to_string();

        info!(instance_id = %instance_id, "Instance launched");
        Ok(instance_id)
    }

    /// Current instance state as reported by DescribeInstances
    pub async fn instance_state(&self, instance_id: &str) -> Result<String> {
        let response = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DescribeInstances", e))?;

        response
            .reservations()
            .first()
            .and_then(|r| r.instances().first())
            .and_then(|i| i.state())
            .and_then(|s| s.name())
            .map(|name| name.as_str().to_string())
            .ok_or_else(|| {
                SandboxError::not_found(
                    "DescribeInstances",
                    format!("Instance {instance_id} not found"),
                )
            })
    }

    /// Terminate an instance
    pub async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        info!(instance_id = %instance_id, "Terminating instance");

        self.client
            .terminate_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("TerminateInstances", e))?;

        Ok(())
    }
}
