//! Security group management

use super::Ec2Client;
use crate::error::{Result, SandboxError};
use aws_sdk_ec2::types::{IpPermission, IpRange, Ipv6Range, PrefixListId, UserIdGroupPair};
use netsandbox_common::IngressRule;
use tracing::info;

/// Convert a request ingress rule into the SDK's `IpPermission`
pub(crate) fn ip_permission(rule: &IngressRule) -> IpPermission {
    let permission = IpPermission::builder()
        .ip_protocol(&rule.ip_protocol)
        .set_from_port(rule.from_port)
        .set_to_port(rule.to_port);

    let permission = rule.ip_ranges.iter().fold(permission, |p, range| {
        p.ip_ranges(
            IpRange::builder()
                .cidr_ip(&range.cidr_ip)
                .set_description(range.description.clone())
                .build(),
        )
    });

    let permission = rule.ipv6_ranges.iter().fold(permission, |p, range| {
        p.ipv6_ranges(
            Ipv6Range::builder()
                .cidr_ipv6(&range.cidr_ipv6)
                .set_description(range.description.clone())
                .build(),
        )
    });

    let permission = rule.user_id_group_pairs.iter().fold(permission, |p, pair| {
        p.user_id_group_pairs(
            UserIdGroupPair::builder()
                .group_id(&pair.group_id)
                .set_description(pair.description.clone())
                .build(),
        )
    });

    rule.prefix_list_ids
        .iter()
        .fold(permission, |p, list| {
            p.prefix_list_ids(
                PrefixListId::builder()
                    .prefix_list_id(&list.prefix_list_id)
                    .set_description(list.description.clone())
                    .build(),
            )
        })
        .build()
}

impl Ec2Client {
    /// Create a security group in the given VPC
    ///
    /// # Returns
    /// The security group ID
    pub async fn create_security_group(
        &self,
        group_name: &str,
        description: &str,
        vpc_id: &str,
    ) -> Result<String> {
        info!(name = %group_name, vpc_id = %vpc_id, "Creating security group");

        let response = self
            .client
            .create_security_group()
            .group_name(group_name)
            .description(description)
            .vpc_id(vpc_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("CreateSecurityGroup", e))?;

        let sg_id = response
            .group_id()
            .ok_or_else(|| SandboxError::missing_field("CreateSecurityGroup", "security group ID"))?
            .to_string();

        info!(sg_id = %sg_id, "Created security group");
        Ok(sg_id)
    }

    /// Authorize all `rules` on the group in a single call
    pub async fn authorize_ingress(&self, group_id: &str, rules: &[IngressRule]) -> Result<()> {
        self.client
            .authorize_security_group_ingress()
            .group_id(group_id)
            .set_ip_permissions(Some(rules.iter().map(ip_permission).collect()))
            .send()
            .await
            .map_err(|e| SandboxError::remote("AuthorizeSecurityGroupIngress", e))?;

        info!(sg_id = %group_id, rules = rules.len(), "Authorized ingress rules");
        Ok(())
    }

    /// Delete a security group
    ///
    /// Fails with a dependency violation while an ENI still references the
    /// group; the caller decides what to do with that.
    pub async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        info!(sg_id = %group_id, "Deleting security group");

        self.client
            .delete_security_group()
            .group_id(group_id)
            .send()
            .await
            .map_err(|e| SandboxError::remote("DeleteSecurityGroup", e))?;

        info!(sg_id = %group_id, "Security group deleted");
        Ok(())
    }
}
