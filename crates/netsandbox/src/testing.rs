//! In-memory EC2 used by the orchestrator tests.
//!
//! Models just enough of EC2 to run whole `start`/`stop` cycles: tagged
//! resources with eventual state transitions, dependency violations on
//! deletes, a call log, and per-operation fault injection.

use crate::aws::ec2::{Ec2Operations, LaunchInstanceConfig, VpcAttribute};
use crate::aws::error::AwsError;
use crate::aws::locator::{ACTIVE_INSTANCE_STATES, ResourceQuery};
use crate::error::{Result, SandboxError};
use netsandbox_common::{IngressRule, ResourceKind, TagPair};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// One resource held by the fake
#[derive(Debug, Clone)]
pub struct FakeResource {
    pub kind: ResourceKind,
    pub state: String,
    pub tags: Vec<TagPair>,
    /// Owning VPC, or the attached VPC for gateways
    pub vpc_id: Option<String>,
    /// Subnet an instance runs in
    pub subnet_id: Option<String>,
    /// Security group of an instance
    pub security_group_id: Option<String>,
    /// Main route table flag
    pub main: bool,
    /// VPC attributes in the order they were enabled
    pub attributes: Vec<VpcAttribute>,
    pub ingress: Vec<IngressRule>,
    pub launch: Option<LaunchInstanceConfig>,
    settles_to: Option<String>,
    pending_polls: u32,
}

impl FakeResource {
    fn new(kind: ResourceKind, state: &str) -> Self {
        Self {
            kind,
            state: state.to_string(),
            tags: Vec::new(),
            vpc_id: None,
            subnet_id: None,
            security_group_id: None,
            main: false,
            attributes: Vec::new(),
            ingress: Vec::new(),
            launch: None,
            settles_to: None,
            pending_polls: 0,
        }
    }

    fn settling(mut self, target: &str, polls: u32) -> Self {
        self.settles_to = Some(target.to_string());
        self.pending_polls = polls;
        self
    }

    pub fn has_tag(&self, pair: &TagPair) -> bool {
        self.tags.contains(pair)
    }

    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    fn is_live_instance(&self) -> bool {
        self.kind == ResourceKind::Instance && self.state != "terminated"
    }
}

#[derive(Default)]
struct Cloud {
    next_id: u32,
    resources: BTreeMap<String, FakeResource>,
    calls: Vec<&'static str>,
    faults: HashMap<&'static str, AwsError>,
}

impl Cloud {
    fn record(&mut self, operation: &'static str) -> Result<()> {
        self.calls.push(operation);
        match self.faults.get(operation) {
            Some(err) => Err(SandboxError::Remote {
                operation,
                source: err.clone(),
            }),
            None => Ok(()),
        }
    }

    fn insert(&mut self, prefix: &str, resource: FakeResource) -> String {
        self.next_id += 1;
        let id = format!("{prefix}-{:04}", self.next_id);
        self.resources.insert(id.clone(), resource);
        id
    }

    fn get_mut(
        &mut self,
        operation: &'static str,
        id: &str,
        kind: ResourceKind,
    ) -> Result<&mut FakeResource> {
        self.resources
            .get_mut(id)
            .filter(|r| r.kind == kind)
            .ok_or_else(|| SandboxError::not_found(operation, format!("The {kind} ID '{id}' does not exist")))
    }

    fn probe(&mut self, operation: &'static str, id: &str, kind: ResourceKind) -> Result<String> {
        let resource = self.get_mut(operation, id, kind)?;
        if let Some(target) = resource.settles_to.clone() {
            if resource.pending_polls == 0 {
                resource.state = target;
                resource.settles_to = None;
            } else {
                resource.pending_polls -= 1;
            }
        }
        Ok(resource.state.clone())
    }

    fn remove(&mut self, operation: &'static str, id: &str, kind: ResourceKind) -> Result<()> {
        self.get_mut(operation, id, kind)?;
        self.resources.remove(id);
        Ok(())
    }

    fn dependency_violation(operation: &'static str, id: &str) -> SandboxError {
        SandboxError::Remote {
            operation,
            source: AwsError::DependencyViolation {
                message: format!("resource {id} has a dependent object"),
            },
        }
    }

    fn is_referenced(&self, id: &str, by: impl Fn(&FakeResource) -> bool) -> bool {
        self.resources.iter().any(|(other, r)| other != id && by(r))
    }
}

/// In-memory EC2 implementing [`Ec2Operations`]
pub struct FakeEc2 {
    cloud: Mutex<Cloud>,
    settle_polls: u32,
}

impl Default for FakeEc2 {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEc2 {
    /// Resources report their transitional state once before settling
    pub fn new() -> Self {
        Self::with_settle_polls(1)
    }

    /// Resources report their transitional state `polls` times before settling
    pub fn with_settle_polls(polls: u32) -> Self {
        Self {
            cloud: Mutex::new(Cloud::default()),
            settle_polls: polls,
        }
    }

    /// Make every call to `operation` fail with `error`
    pub fn fail(&self, operation: &'static str, error: AwsError) {
        self.cloud.lock().unwrap().faults.insert(operation, error);
    }

    /// Operation names in call order
    pub fn calls(&self) -> Vec<&'static str> {
        self.cloud.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls().iter().filter(|c| **c == operation).count()
    }

    pub fn clear_calls(&self) {
        self.cloud.lock().unwrap().calls.clear();
    }

    pub fn resource(&self, id: &str) -> Option<FakeResource> {
        self.cloud.lock().unwrap().resources.get(id).cloned()
    }

    /// Every resource of `kind` whose instances are not terminated
    pub fn live(&self, kind: ResourceKind) -> Vec<(String, FakeResource)> {
        self.cloud
            .lock()
            .unwrap()
            .resources
            .iter()
            .filter(|(_, r)| r.kind == kind && (kind != ResourceKind::Instance || r.is_live_instance()))
            .map(|(id, r)| (id.clone(), r.clone()))
            .collect()
    }

    /// Add a settled, tagged resource without recording a call
    pub fn seed(&self, kind: ResourceKind, tags: Vec<TagPair>) -> String {
        let (prefix, state) = match kind {
            ResourceKind::Vpc => ("vpc", "available"),
            ResourceKind::Subnet => ("subnet", "available"),
            ResourceKind::InternetGateway => ("igw", "available"),
            ResourceKind::RouteTable => ("rtb", "available"),
            ResourceKind::SecurityGroup => ("sg", "available"),
            ResourceKind::Instance => ("i", "running"),
        };
        let mut resource = FakeResource::new(kind, state);
        resource.tags = tags;
        self.cloud.lock().unwrap().insert(prefix, resource)
    }
}

impl Ec2Operations for FakeEc2 {
    async fn create_vpc(&self, _cidr_block: &str) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("CreateVpc")?;
        let vpc_id = cloud.insert(
            "vpc",
            FakeResource::new(ResourceKind::Vpc, "pending").settling("available", self.settle_polls),
        );
        let mut route_table = FakeResource::new(ResourceKind::RouteTable, "available");
        route_table.vpc_id = Some(vpc_id.clone());
        route_table.main = true;
        cloud.insert("rtb", route_table);
        Ok(vpc_id)
    }

    async fn vpc_state(&self, vpc_id: &str) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DescribeVpcs")?;
        cloud.probe("DescribeVpcs", vpc_id, ResourceKind::Vpc)
    }

    async fn enable_vpc_attribute(&self, vpc_id: &str, attribute: VpcAttribute) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("ModifyVpcAttribute")?;
        let vpc = cloud.get_mut("ModifyVpcAttribute", vpc_id, ResourceKind::Vpc)?;
        if attribute == VpcAttribute::DnsHostnames && !vpc.attributes.contains(&VpcAttribute::DnsSupport) {
            return Err(SandboxError::Remote {
                operation: "ModifyVpcAttribute",
                source: AwsError::Sdk {
                    code: Some("InvalidParameterValue".to_string()),
                    message: "DNS hostnames require DNS support".to_string(),
                },
            });
        }
        vpc.attributes.push(attribute);
        Ok(())
    }

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DeleteVpc")?;
        cloud.get_mut("DeleteVpc", vpc_id, ResourceKind::Vpc)?;
        let in_use = cloud.is_referenced(vpc_id, |r| {
            r.kind != ResourceKind::RouteTable && r.vpc_id.as_deref() == Some(vpc_id)
        });
        if in_use {
            return Err(Cloud::dependency_violation("DeleteVpc", vpc_id));
        }
        cloud
            .resources
            .retain(|_, r| !(r.kind == ResourceKind::RouteTable && r.vpc_id.as_deref() == Some(vpc_id)));
        cloud.remove("DeleteVpc", vpc_id, ResourceKind::Vpc)
    }

    async fn create_subnet(
        &self,
        vpc_id: &str,
        _cidr_block: &str,
        _availability_zone: Option<String>,
    ) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("CreateSubnet")?;
        cloud.get_mut("CreateSubnet", vpc_id, ResourceKind::Vpc)?;
        let mut subnet =
            FakeResource::new(ResourceKind::Subnet, "pending").settling("available", self.settle_polls);
        subnet.vpc_id = Some(vpc_id.to_string());
        Ok(cloud.insert("subnet", subnet))
    }

    async fn subnet_state(&self, subnet_id: &str) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DescribeSubnets")?;
        cloud.probe("DescribeSubnets", subnet_id, ResourceKind::Subnet)
    }

    async fn enable_public_ip_on_launch(&self, subnet_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("ModifySubnetAttribute")?;
        cloud.get_mut("ModifySubnetAttribute", subnet_id, ResourceKind::Subnet)?;
        Ok(())
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DeleteSubnet")?;
        cloud.get_mut("DeleteSubnet", subnet_id, ResourceKind::Subnet)?;
        if cloud.is_referenced(subnet_id, |r| {
            r.is_live_instance() && r.subnet_id.as_deref() == Some(subnet_id)
        }) {
            return Err(Cloud::dependency_violation("DeleteSubnet", subnet_id));
        }
        cloud.remove("DeleteSubnet", subnet_id, ResourceKind::Subnet)
    }

    async fn create_internet_gateway(&self) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("CreateInternetGateway")?;
        Ok(cloud.insert(
            "igw",
            FakeResource::new(ResourceKind::InternetGateway, "available"),
        ))
    }

    async fn attach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("AttachInternetGateway")?;
        cloud.get_mut("AttachInternetGateway", vpc_id, ResourceKind::Vpc)?;
        let gateway = cloud.get_mut("AttachInternetGateway", gateway_id, ResourceKind::InternetGateway)?;
        gateway.vpc_id = Some(vpc_id.to_string());
        Ok(())
    }

    async fn detach_internet_gateway(&self, gateway_id: &str, vpc_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DetachInternetGateway")?;
        let gateway = cloud.get_mut("DetachInternetGateway", gateway_id, ResourceKind::InternetGateway)?;
        if gateway.vpc_id.as_deref() != Some(vpc_id) {
            return Err(SandboxError::Remote {
                operation: "DetachInternetGateway",
                source: AwsError::NotFound {
                    message: format!("resource {gateway_id} is not attached to network {vpc_id}"),
                },
            });
        }
        gateway.vpc_id = None;
        Ok(())
    }

    async fn delete_internet_gateway(&self, gateway_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DeleteInternetGateway")?;
        let gateway = cloud.get_mut("DeleteInternetGateway", gateway_id, ResourceKind::InternetGateway)?;
        if gateway.vpc_id.is_some() {
            return Err(Cloud::dependency_violation("DeleteInternetGateway", gateway_id));
        }
        cloud.remove("DeleteInternetGateway", gateway_id, ResourceKind::InternetGateway)
    }

    async fn associate_route_table(&self, route_table_id: &str, subnet_id: &str) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("AssociateRouteTable")?;
        cloud.get_mut("AssociateRouteTable", subnet_id, ResourceKind::Subnet)?;
        cloud.get_mut("AssociateRouteTable", route_table_id, ResourceKind::RouteTable)?;
        Ok(format!("rtbassoc-{route_table_id}"))
    }

    async fn create_route(
        &self,
        route_table_id: &str,
        _destination_cidr: &str,
        gateway_id: &str,
    ) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("CreateRoute")?;
        cloud.get_mut("CreateRoute", gateway_id, ResourceKind::InternetGateway)?;
        cloud.get_mut("CreateRoute", route_table_id, ResourceKind::RouteTable)?;
        Ok(())
    }

    async fn create_security_group(
        &self,
        _group_name: &str,
        _description: &str,
        vpc_id: &str,
    ) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("CreateSecurityGroup")?;
        cloud.get_mut("CreateSecurityGroup", vpc_id, ResourceKind::Vpc)?;
        let mut group = FakeResource::new(ResourceKind::SecurityGroup, "available");
        group.vpc_id = Some(vpc_id.to_string());
        Ok(cloud.insert("sg", group))
    }

    async fn authorize_ingress(&self, group_id: &str, rules: Vec<IngressRule>) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("AuthorizeSecurityGroupIngress")?;
        let group = cloud.get_mut("AuthorizeSecurityGroupIngress", group_id, ResourceKind::SecurityGroup)?;
        group.ingress.extend(rules);
        Ok(())
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DeleteSecurityGroup")?;
        cloud.get_mut("DeleteSecurityGroup", group_id, ResourceKind::SecurityGroup)?;
        if cloud.is_referenced(group_id, |r| {
            r.is_live_instance() && r.security_group_id.as_deref() == Some(group_id)
        }) {
            return Err(Cloud::dependency_violation("DeleteSecurityGroup", group_id));
        }
        cloud.remove("DeleteSecurityGroup", group_id, ResourceKind::SecurityGroup)
    }

    async fn run_instance(&self, config: LaunchInstanceConfig) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("RunInstances")?;
        cloud.get_mut("RunInstances", &config.subnet_id, ResourceKind::Subnet)?;
        cloud.get_mut("RunInstances", &config.security_group_id, ResourceKind::SecurityGroup)?;
        let mut instance =
            FakeResource::new(ResourceKind::Instance, "pending").settling("running", self.settle_polls);
        instance.tags = config.tags.clone();
        instance.subnet_id = Some(config.subnet_id.clone());
        instance.security_group_id = Some(config.security_group_id.clone());
        instance.launch = Some(config);
        Ok(cloud.insert("i", instance))
    }

    async fn instance_state(&self, instance_id: &str) -> Result<String> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("DescribeInstances")?;
        cloud.probe("DescribeInstances", instance_id, ResourceKind::Instance)
    }

    async fn terminate_instance(&self, instance_id: &str) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("TerminateInstances")?;
        let settle_polls = self.settle_polls;
        let instance = cloud.get_mut("TerminateInstances", instance_id, ResourceKind::Instance)?;
        if instance.state != "terminated" {
            instance.state = "shutting-down".to_string();
            instance.settles_to = Some("terminated".to_string());
            instance.pending_polls = settle_polls;
        }
        Ok(())
    }

    async fn create_tags(&self, resource_id: &str, tags: Vec<TagPair>) -> Result<()> {
        let mut cloud = self.cloud.lock().unwrap();
        cloud.record("CreateTags")?;
        let resource = cloud.resources.get_mut(resource_id).ok_or_else(|| {
            SandboxError::not_found("CreateTags", format!("The ID '{resource_id}' does not exist"))
        })?;
        for tag in tags {
            resource.tags.retain(|t| t.key != tag.key);
            resource.tags.push(tag);
        }
        Ok(())
    }

    async fn find_ids(&self, query: &ResourceQuery) -> Result<Vec<String>> {
        let mut cloud = self.cloud.lock().unwrap();
        let operation = match query.kind() {
            ResourceKind::Vpc => "DescribeVpcs",
            ResourceKind::Subnet => "DescribeSubnets",
            ResourceKind::SecurityGroup => "DescribeSecurityGroups",
            ResourceKind::Instance => "DescribeInstances",
            ResourceKind::InternetGateway => "DescribeInternetGateways",
            ResourceKind::RouteTable => "DescribeRouteTables",
        };
        cloud.record(operation)?;

        let matches = |r: &FakeResource| match query {
            ResourceQuery::Vpc { name }
            | ResourceQuery::Subnet { name }
            | ResourceQuery::SecurityGroup { name } => r.has_tag(name),
            ResourceQuery::Instance { name } => {
                r.has_tag(name) && ACTIVE_INSTANCE_STATES.contains(&r.state.as_str())
            }
            ResourceQuery::InternetGateways { vpc_id } => r.vpc_id.as_ref() == Some(vpc_id),
            ResourceQuery::MainRouteTable { vpc_id } => r.main && r.vpc_id.as_ref() == Some(vpc_id),
        };

        Ok(cloud
            .resources
            .iter()
            .filter(|(_, r)| r.kind == query.kind() && matches(r))
            .map(|(id, _)| id.clone())
            .collect())
    }
}
