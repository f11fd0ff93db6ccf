//! VPC, subnet, internet gateway and routing operations

use super::Ec2Client;
use super::types::VpcAttribute;
use crate::error::{Result, SandboxError};
use aws_sdk_ec2::types::AttributeBooleanValue;
use tracing::{debug, info};

fn enabled() -> AttributeBooleanValue {
    AttributeBooleanValue::builder().value(true).build()
}

impl Ec2Client {
    /// Create a VPC with the given CIDR block
    pub async fn create_vpc(&self, cidr_block: &str) -> Result<String> {
        let response = self
            .client
            .create_vpc()
            .cidr_block(cidr_block)
            .send()
            .await
            .map_err(|e| SandboxError::remote("CreateVpc", e))?;

        let vpc_id = response
            .vpc()
            .and_then(|v| v.vpc_id())
            .ok_or_else(|| SandboxError::missing_field("CreateVpc", "VPC ID"))?
            .to_string();

        info!(vpc_id = %vpc_id, cidr = %cidr_block, "Created VPC");
        Ok(vpc_id)
    }

    /// Current VPC state as reported by DescribeVpcs
    pub async fn vpc_state(&self, vpc_id: &str) -> Result<String> {
        let response = self
            .client
            .describe_vpcs()
            .vpc_ids(vpc_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DescribeVpcs", e))?;

        response
            .vpcs()
            .first()
            .and_then(|v| v.state())
            .map(|s| s.as_str().to_string())
            .ok_or_else(|| SandboxError::not_found("DescribeVpcs", format!("VPC {vpc_id} not found")))
    }

    /// Enable a boolean VPC attribute.
    ///
    /// ModifyVpcAttribute accepts a single attribute per call.
    pub async fn enable_vpc_attribute(&self, vpc_id: &str, attribute: VpcAttribute) -> Result<()> {
        let request = self.client.modify_vpc_attribute().vpc_id(vpc_id);
        let request = match attribute {
            VpcAttribute::DnsSupport => request.enable_dns_support(enabled()),
            VpcAttribute::DnsHostnames => request.enable_dns_hostnames(enabled()),
        };
        request
            .send()
            .await
            .map_err(|e| SandboxError::remote("ModifyVpcAttribute", e))?;

        debug!(vpc_id = %vpc_id, attribute = %attribute, "Enabled VPC attribute");
        Ok(())
    }

    /// Delete a VPC
    pub async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        self.client
            .delete_vpc()
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DeleteVpc", e))?;

        info!(vpc_id = %vpc_id, "Deleted VPC");
        Ok(())
    }

    /// Create a subnet, optionally pinned to an availability zone
    pub async fn create_subnet(
        &self,
        vpc_id: &str,
        cidr_block: &str,
        availability_zone: Option<&str>,
    ) -> Result<String> {
        let response = self
            .client
            .create_subnet()
            .vpc_id(vpc_id)
            .cidr_block(cidr_block)
            .set_availability_zone(availability_zone.map(String::from))
            .send()
            .await
            .map_err(|e| SandboxError::remote("CreateSubnet", e))?;

        let subnet_id = response
            .subnet()
            .and_then(|s| s.subnet_id())
            .ok_or_else(|| SandboxError::missing_field("CreateSubnet", "subnet ID"))?
            .to_string();

        info!(
            subnet_id = %subnet_id,
            vpc_id = %vpc_id,
            cidr = %cidr_block,
            availability_zone = ?availability_zone,
            "Created subnet"
        );
        Ok(subnet_id)
    }

    /// Current subnet state as reported by DescribeSubnets
    pub async fn subnet_state(&self, subnet_id: &str) -> Result<String> {
        let response = self
            .client
            .describe_subnets()
            .subnet_ids(subnet_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DescribeSubnets", e))?;

        response
            .subnets()
            .first()
            .and_then(|s| s.state())
            .map(|s| s.as_str().to_string())
            .ok_or_else(|| {
                SandboxError::not_found("DescribeSubnets", format!("Subnet {subnet_id} not found"))
            })
    }

    /// Give instances launched in the subnet a public IPv4 address
    pub async fn enable_public_ip_on_launch(&self, subnet_id: &str) -> Result<()> {
        self.client
            .modify_subnet_attribute()
            .subnet_id(subnet_id)
            .map_public_ip_on_launch(enabled())
            .send()
            .await
            .map_err(|e| SandboxError::remote("ModifySubnetAttribute", e))?;

        debug!(subnet_id = %subnet_id, "Enabled public IP on launch");
        Ok(())
    }

    /// Delete a subnet
    pub async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.client
            .delete_subnet()
            .subnet_id(subnet_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DeleteSubnet", e))?;

        info!(subnet_id = %subnet_id, "Deleted subnet");
        Ok(())
    }

    /// Create a detached internet gateway
    pub async fn create_internet_gateway(&self) -> Result<String> {
        let response = self
            .client
            .create_internet_gateway()
            .send()
            .await
            .map_err(|e| SandboxError::remote("CreateInternetGateway", e))?;

        let gateway_id = response
            .internet_gateway()
            .and_then(|g| g.internet_gateway_id())
            .ok_or_else(|| SandboxError::missing_field("CreateInternetGateway", "gateway ID"))?
            .to_string();

        info!(gateway_id = %gateway_id, "Created internet gateway");
        Ok(gateway_id)
    }

    pub async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.client
            .attach_internet_gateway()
            .internet_gateway_id(gateway_id)
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("AttachInternetGateway", e))?;

        debug!(gateway_id = %gateway_id, vpc_id = %vpc_id, "Attached internet gateway");
        Ok(())
    }

    pub async fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.client
            .detach_internet_gateway()
            .internet_gateway_id(gateway_id)
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DetachInternetGateway", e))?;

        debug!(gateway_id = %gateway_id, vpc_id = %vpc_id, "Detached internet gateway");
        Ok(())
    }

    pub async fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()> {
        self.client
            .delete_internet_gateway()
            .internet_gateway_id(gateway_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DeleteInternetGateway", e))?;

        info!(gateway_id = %gateway_id, "Deleted internet gateway");
        Ok(())
    }

    /// Associate a route table with a subnet
    pub async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> Result<String> {
        let response = self
            .client
            .associate_route_table()
            .route_table_id(route_table_id)
            .subnet_id(subnet_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("AssociateRouteTable", e))?;

        let association_id = response
            .association_id()
            .ok_or_else(|| SandboxError::missing_field("AssociateRouteTable", "association ID"))?
            .to_string();

        debug!(
            route_table_id = %route_table_id,
            subnet_id = %subnet_id,
            association_id = %association_id,
            "Associated route table"
        );
        Ok(association_id)
    }

    /// Route `destination_cidr` through an internet gateway
    pub async fn create_route(
        &self,
        route_table_id: &str,
        destination_cidr: &str,
        gateway_id: &str,
    ) -> Result<()> {
        self.client
            .create_route()
            .route_table_id(route_table_id)
            .destination_cidr_block(destination_cidr)
            .gateway_id(gateway_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("CreateRoute", e))?;

        debug!(
            route_table_id = %route_table_id,
            destination = %destination_cidr,
            gateway_id = %gateway_id,
            "Created route"
        );
        Ok(())
    }
}
