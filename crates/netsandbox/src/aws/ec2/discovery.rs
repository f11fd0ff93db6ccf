//! Describe calls backing the tag-indexed locator

use super::Ec2Client;
use crate::aws::locator::ResourceQuery;
use crate::error::{Result, SandboxError};

impl Ec2Client {
    /// Run the describe call for `query` and collect the matching IDs
    pub async fn find_ids(&self, query: &ResourceQuery) -> Result<Vec<String>> {
        let filters = Some(query.filters());

        let ids: Vec<String> = match query {
            ResourceQuery::Vpc { .. } => self
                .client
                .describe_vpcs()
                .set_filters(filters)
                .send()
                .await
                .map_err(|e| SandboxError::remote("DescribeVpcs", e))?
                .vpcs()
                .iter()
                .filter_map(|v| v.vpc_id().map(String::from))
                .collect(),

            ResourceQuery::Subnet { .. } => self
                .client
                .describe_subnets()
                .set_filters(filters)
                .send()
                .await
                .map_err(|e| SandboxError::remote("DescribeSubnets", e))?
                .subnets()
                .iter()
                .filter_map(|s| s.subnet_id().map(String::from))
                .collect(),

            ResourceQuery::SecurityGroup { .. } => self
                .client
                .describe_security_groups()
                .set_filters(filters)
                .send()
                .await
                .map_err(|e| SandboxError::remote("DescribeSecurityGroups", e))?
                .security_groups()
                .iter()
                .filter_map(|g| g.group_id().map(String::from))
                .collect(),

            ResourceQuery::Instance { .. } => self
                .client
                .describe_instances()
                .set_filters(filters)
                .send()
                .await
                .map_err(|e| SandboxError::remote("DescribeInstances", e))?
                .reservations()
                .iter()
                .flat_map(|r| r.instances())
                .filter_map(|i| i.instance_id().map(String::from))
                .collect(),

            ResourceQuery::InternetGateways { .. } => self
                .client
                .describe_internet_gateways()
                .set_filters(filters)
                .send()
                .await
                .map_err(|e| SandboxError::remote("DescribeInternetGateways", e))?
                .internet_gateways()
                .iter()
                .filter_map(|g| g.internet_gateway_id().map(String::from))
                .collect(),

            ResourceQuery::MainRouteTable { .. } => self
                .client
                .describe_route_tables()
                .set_filters(filters)
                .send()
                .await
                .map_err(|e| SandboxError::remote("DescribeRouteTables", e))?
                .route_tables()
                .iter()
                .filter_map(|t| t.route_table_id().map(String::from))
                .collect(),
        };

        Ok(ids)
    }
}
