//! Tag-indexed resource discovery
//!
//! Teardown never stores identifiers between invocations. Instead each
//! resource is found again from its name tag (or, for resources that are
//! not tagged by name, from the VPC they belong to).

use crate::aws::ec2::Ec2Operations;
use crate::aws::tags::tag_filter;
use crate::error::Result;
use aws_sdk_ec2::types::Filter;
use netsandbox_common::{ResourceKind, TagNamespace, TagPair};
use tracing::debug;

/// Instance states that still count as "present".
///
/// Terminated instances stay visible to DescribeInstances for a while; they
/// are excluded so a finished teardown leaves nothing discoverable.
pub const ACTIVE_INSTANCE_STATES: &[&str] =
    &["pending", "running", "shutting-down", "stopping", "stopped"];

/// One lookup the locator knows how to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceQuery {
    Vpc { name: TagPair },
    Subnet { name: TagPair },
    SecurityGroup { name: TagPair },
    Instance { name: TagPair },
    /// Gateways attached to a VPC
    InternetGateways { vpc_id: String },
    /// The route table marked as main for a VPC
    MainRouteTable { vpc_id: String },
}

impl ResourceQuery {
    pub fn vpc(tags: &TagNamespace) -> Self {
        Self::Vpc {
            name: tags.name_tag(ResourceKind::Vpc),
        }
    }

    pub fn subnet(tags: &TagNamespace) -> Self {
        Self::Subnet {
            name: tags.name_tag(ResourceKind::Subnet),
        }
    }

    pub fn security_group(tags: &TagNamespace) -> Self {
        Self::SecurityGroup {
            name: tags.name_tag(ResourceKind::SecurityGroup),
        }
    }

    pub fn instance(tags: &TagNamespace) -> Self {
        Self::Instance {
            name: tags.name_tag(ResourceKind::Instance),
        }
    }

    /// Kind of resource this query returns
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Vpc { .. } => ResourceKind::Vpc,
            Self::Subnet { .. } => ResourceKind::Subnet,
            Self::SecurityGroup { .. } => ResourceKind::SecurityGroup,
            Self::Instance { .. } => ResourceKind::Instance,
            Self::InternetGateways { .. } => ResourceKind::InternetGateway,
            Self::MainRouteTable { .. } => ResourceKind::RouteTable,
        }
    }

    /// Describe filters for this query
    pub fn filters(&self) -> Vec<Filter> {
        match self {
            Self::Vpc { name } | Self::Subnet { name } | Self::SecurityGroup { name } => {
                vec![tag_filter(name)]
            }
            Self::Instance { name } => vec![
                tag_filter(name),
                ACTIVE_INSTANCE_STATES
                    .iter()
                    .fold(
                        Filter::builder().name("instance-state-name"),
                        |builder, state| builder.values(*state),
                    )
                    .build(),
            ],
            Self::InternetGateways { vpc_id } => vec![
                Filter::builder()
                    .name("attachment.vpc-id")
                    .values(vpc_id)
                    .build(),
            ],
            Self::MainRouteTable { vpc_id } => vec![
                Filter::builder().name("vpc-id").values(vpc_id).build(),
                Filter::builder()
                    .name("association.main")
                    .values("true")
                    .build(),
            ],
        }
    }
}

/// Resolve a query to its first match, `None` when nothing matches.
///
/// When several resources match, the first one returned by the provider wins.
pub async fn locate<E: Ec2Operations>(ec2: &E, query: &ResourceQuery) -> Result<Option<String>> {
    let id = ec2.find_ids(query).await?.into_iter().next();
    match &id {
        Some(id) => debug!(kind = %query.kind(), id = %id, "Located resource"),
        None => debug!(kind = %query.kind(), query = ?query, "No matching resource"),
    }
    Ok(id)
}

/// Resolve a query to every match.
pub async fn locate_all<E: Ec2Operations>(ec2: &E, query: &ResourceQuery) -> Result<Vec<String>> {
    let ids = ec2.find_ids(query).await?;
    debug!(kind = %query.kind(), count = ids.len(), "Located resources");
    Ok(ids)
}
