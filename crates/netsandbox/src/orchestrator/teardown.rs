//! Sandbox teardown by tag discovery
//!
//! Every resource is resolved independently from its name tag, so a
//! sandbox that was only partially provisioned (or partially torn down
//! already) is cleaned up as far as it exists.

use crate::aws::ec2::Ec2Operations;
use crate::aws::locator::{ResourceQuery, locate, locate_all};
use crate::config::WaitSettings;
use crate::error::{Result, ignore_not_found};
use crate::wait::wait_for_state;
use netsandbox_common::{ResourceIds, ResourceKind, TagNamespace};
use tracing::{debug, info, instrument, warn};

const TERMINATED: &str = "terminated";

/// Resources resolved (and removed) by one teardown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub instance_id: Option<String>,
    pub subnet_id: Option<String>,
    pub security_group_id: Option<String>,
    pub vpc_id: Option<String>,
    pub internet_gateway_ids: Vec<String>,
}

impl From<TeardownReport> for ResourceIds {
    fn from(report: TeardownReport) -> Self {
        ResourceIds {
            vpc_id: report.vpc_id,
            subnet_id: report.subnet_id,
            instance_id: report.instance_id,
            security_group_id: report.security_group_id,
            internet_gateway_id: report.internet_gateway_ids.into_iter().next(),
            route_table_id: None,
        }
    }
}

/// Drives the `stop` phase
pub struct Teardown<'a, E> {
    ec2: &'a E,
    waits: &'a WaitSettings,
}

impl<'a, E: Ec2Operations> Teardown<'a, E> {
    pub fn new(ec2: &'a E, waits: &'a WaitSettings) -> Self {
        Self { ec2, waits }
    }

    /// Remove every sandbox resource tagged within `tags`.
    ///
    /// Missing resources are skipped. A security group that cannot be
    /// deleted aborts the run before the VPC is touched.
    #[instrument(skip_all, fields(name = %tags.name_value))]
    pub async fn teardown(&self, tags: &TagNamespace) -> Result<TeardownReport> {
        let ec2 = self.ec2;

        let mut report = TeardownReport {
            instance_id: locate(ec2, &ResourceQuery::instance(tags)).await?,
            subnet_id: locate(ec2, &ResourceQuery::subnet(tags)).await?,
            security_group_id: locate(ec2, &ResourceQuery::security_group(tags)).await?,
            vpc_id: locate(ec2, &ResourceQuery::vpc(tags)).await?,
            internet_gateway_ids: Vec::new(),
        };
        info!(
            instance_id = ?report.instance_id,
            subnet_id = ?report.subnet_id,
            sg_id = ?report.security_group_id,
            vpc_id = ?report.vpc_id,
            "Resolved sandbox resources"
        );

        if let Some(instance_id) = &report.instance_id {
            self.terminate_instance(instance_id).await?;
        }

        if let Some(subnet_id) = &report.subnet_id {
            match ignore_not_found(ec2.delete_subnet(subnet_id).await)? {
                Some(()) => info!(subnet_id = %subnet_id, "Subnet deleted"),
                None => debug!(subnet_id = %subnet_id, "Subnet already deleted"),
            }
        }

        if let Some(sg_id) = &report.security_group_id {
            match ignore_not_found(ec2.delete_security_group(sg_id).await) {
                Ok(Some(())) => info!(sg_id = %sg_id, "Security group deleted"),
                Ok(None) => debug!(sg_id = %sg_id, "Security group already deleted"),
                Err(e) => {
                    warn!(
                        sg_id = %sg_id,
                        kind = ?e.aws_error(),
                        error = %e,
                        "Failed to delete security group, skipping VPC cleanup"
                    );
                    return Err(e);
                }
            }
        }

        if let Some(vpc_id) = &report.vpc_id {
            report.internet_gateway_ids = self.delete_vpc(vpc_id).await?;
        }

        info!("Sandbox torn down");
        Ok(report)
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        let ec2 = self.ec2;
        if ignore_not_found(ec2.terminate_instance(instance_id).await)?.is_none() {
            debug!(instance_id = %instance_id, "Instance already gone");
            return Ok(());
        }

        wait_for_state(
            &self.waits.instance,
            ResourceKind::Instance,
            instance_id,
            TERMINATED,
            || async move {
                // An instance that can no longer be described is gone
                match ec2.instance_state(instance_id).await {
                    Err(e) if e.is_not_found() => Ok(TERMINATED.to_string()),
                    other => other,
                }
            },
        )
        .await?;

        info!(instance_id = %instance_id, "Instance terminated");
        Ok(())
    }

    /// Detach and delete attached gateways, then delete the VPC
    async fn delete_vpc(&self, vpc_id: &str) -> Result<Vec<String>> {
        let ec2 = self.ec2;
        let gateway_ids = locate_all(ec2, &ResourceQuery::InternetGateways {
            vpc_id: vpc_id.to_string(),
        })
        .await?;

        for gateway_id in &gateway_ids {
            ignore_not_found(ec2.detach_internet_gateway(gateway_id, vpc_id).await)?;
            match ignore_not_found(ec2.delete_internet_gateway(gateway_id).await)? {
                Some(()) => info!(gateway_id = %gateway_id, "Internet gateway deleted"),
                None => debug!(gateway_id = %gateway_id, "Internet gateway already deleted"),
            }
        }

        match ignore_not_found(ec2.delete_vpc(vpc_id).await)? {
            Some(()) => info!(vpc_id = %vpc_id, "VPC deleted"),
            None => debug!(vpc_id = %vpc_id, "VPC already deleted"),
        }
        Ok(gateway_ids)
    }
}
