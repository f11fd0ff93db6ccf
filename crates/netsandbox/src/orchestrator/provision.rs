//! Sandbox provisioning
//!
//! Builds the resource chain in dependency order. Each step feeds its ID to
//! the next and the chain halts at the first failure. Nothing created before
//! a failure is rolled back; the created handles are logged instead so the
//! leftovers can be found (or removed with a `stop` for the same namespace).

use crate::aws::ec2::{Ec2Operations, LaunchInstanceConfig, VpcAttribute};
use crate::aws::locator::{ResourceQuery, locate};
use crate::config::WaitSettings;
use crate::error::{Result, SandboxError};
use crate::wait::wait_for_state;
use netsandbox_common::defaults::DEFAULT_ROUTE_CIDR;
use netsandbox_common::{Request, ResourceHandle, ResourceIds, ResourceKind};
use tracing::{debug, info, instrument, warn};

/// State VPCs and subnets must reach before they are used
const AVAILABLE: &str = "available";

/// IDs of a fully provisioned sandbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedSandbox {
    pub vpc_id: String,
    pub route_table_id: String,
    pub subnet_id: String,
    pub internet_gateway_id: String,
    pub security_group_id: String,
    pub instance_id: String,
}

impl From<ProvisionedSandbox> for ResourceIds {
    fn from(sandbox: ProvisionedSandbox) -> Self {
        ResourceIds {
            vpc_id: Some(sandbox.vpc_id),
            subnet_id: Some(sandbox.subnet_id),
            instance_id: Some(sandbox.instance_id),
            security_group_id: Some(sandbox.security_group_id),
            internet_gateway_id: Some(sandbox.internet_gateway_id),
            route_table_id: Some(sandbox.route_table_id),
        }
    }
}

/// Drives the `start` phase
pub struct Provisioner<'a, E> {
    ec2: &'a E,
    waits: &'a WaitSettings,
}

impl<'a, E: Ec2Operations> Provisioner<'a, E> {
    pub fn new(ec2: &'a E, waits: &'a WaitSettings) -> Self {
        Self { ec2, waits }
    }

    /// Create, tag and connect every sandbox resource.
    #[instrument(skip_all, fields(name = %request.tags.name_value))]
    pub async fn provision(&self, request: &Request) -> Result<ProvisionedSandbox> {
        info!(
            vpc_cidr = %request.network.vpc_cidr,
            subnet_cidr = %request.network.subnet_cidr,
            instance_type = %request.compute.instance_type,
            "Provisioning sandbox"
        );

        let mut created = Vec::new();
        match self.build(request, &mut created).await {
            Ok(sandbox) => {
                info!(
                    vpc_id = %sandbox.vpc_id,
                    subnet_id = %sandbox.subnet_id,
                    instance_id = %sandbox.instance_id,
                    "Sandbox provisioned"
                );
                Ok(sandbox)
            }
            Err(e) => {
                let handles: Vec<String> = created.iter().map(ToString::to_string).collect();
                warn!(
                    error = %e,
                    created = ?handles,
                    "Provisioning failed, created resources were left in place"
                );
                Err(e)
            }
        }
    }

    async fn build(
        &self,
        request: &Request,
        created: &mut Vec<ResourceHandle>,
    ) -> Result<ProvisionedSandbox> {
        let ec2 = self.ec2;
        let network = &request.network;

        let vpc_id = ec2.create_vpc(&network.vpc_cidr).await?;
        created.push(ResourceHandle::new(ResourceKind::Vpc, &vpc_id));
        self.tag(&vpc_id, ResourceKind::Vpc, request).await?;
        let id = vpc_id.as_str();
        wait_for_state(&self.waits.network, ResourceKind::Vpc, id, AVAILABLE, || {
            ec2.vpc_state(id)
        })
        .await?;

        let route_table_id = locate(ec2, &ResourceQuery::MainRouteTable {
            vpc_id: vpc_id.clone(),
        })
        .await?
        .ok_or_else(|| {
            SandboxError::not_found(
                "DescribeRouteTables",
                format!("No main route table for VPC {vpc_id}"),
            )
        })?;
        self.tag(&route_table_id, ResourceKind::RouteTable, request)
            .await?;

        let subnet_id = ec2
            .create_subnet(
                &vpc_id,
                &network.subnet_cidr,
                network.availability_zone.clone(),
            )
            .await?;
        created.push(ResourceHandle::new(ResourceKind::Subnet, &subnet_id));
        self.tag(&subnet_id, ResourceKind::Subnet, request).await?;
        let id = subnet_id.as_str();
        wait_for_state(&self.waits.network, ResourceKind::Subnet, id, AVAILABLE, || {
            ec2.subnet_state(id)
        })
        .await?;
        ec2.enable_public_ip_on_launch(&subnet_id).await?;

        let internet_gateway_id = ec2.create_internet_gateway().await?;
        created.push(ResourceHandle::new(
            ResourceKind::InternetGateway,
            &internet_gateway_id,
        ));
        self.tag(&internet_gateway_id, ResourceKind::InternetGateway, request)
            .await?;
        ec2.attach_internet_gateway(&internet_gateway_id, &vpc_id)
            .await?;

        let association_id = ec2
            .associate_route_table(&route_table_id, &subnet_id)
            .await?;
        debug!(association_id = %association_id, "Route table associated with subnet");
        ec2.create_route(&route_table_id, DEFAULT_ROUTE_CIDR, &internet_gateway_id)
            .await?;

        // Hostnames can only be enabled once DNS support is on
        ec2.enable_vpc_attribute(&vpc_id, VpcAttribute::DnsSupport)
            .await?;
        ec2.enable_vpc_attribute(&vpc_id, VpcAttribute::DnsHostnames)
            .await?;

        let tags = &request.tags;
        let security_group_id = ec2
            .create_security_group(
                &tags.name_for(ResourceKind::SecurityGroup),
                &format!("netsandbox security group for {}", tags.name_value),
                &vpc_id,
            )
            .await?;
        created.push(ResourceHandle::new(
            ResourceKind::SecurityGroup,
            &security_group_id,
        ));
        self.tag(&security_group_id, ResourceKind::SecurityGroup, request)
            .await?;
        if request.ingress_rules.is_empty() {
            debug!(sg_id = %security_group_id, "No ingress rules requested");
        } else {
            ec2.authorize_ingress(&security_group_id, request.ingress_rules.clone())
                .await?;
        }

        let compute = &request.compute;
        let launch = LaunchInstanceConfig::new(
            &compute.ami_id,
            &compute.instance_type,
            &subnet_id,
            &security_group_id,
        )
        .with_key_name(compute.key_pair.clone())
        .with_availability_zone(network.availability_zone.clone())
        .with_tags(tags.tags_for(ResourceKind::Instance));
        let instance_id = ec2.run_instance(launch).await?;
        created.push(ResourceHandle::new(ResourceKind::Instance, &instance_id));

        Ok(ProvisionedSandbox {
            vpc_id,
            route_table_id,
            subnet_id,
            internet_gateway_id,
            security_group_id,
            instance_id,
        })
    }

    async fn tag(&self, resource_id: &str, kind: ResourceKind, request: &Request) -> Result<()> {
        self.ec2
            .create_tags(resource_id, request.tags.tags_for(kind))
            .await
    }
}
