//! Sandbox resource kinds and their name-tag suffixes
//!
//! Every resource created during provisioning carries a name tag built from
//! the request's namespace value plus the suffix of its kind. Teardown finds
//! resources again through exactly these suffixes.

/// Types of AWS resources that make up a sandbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceKind {
    /// VPC (the network)
    Vpc,
    /// Subnet inside the VPC
    Subnet,
    /// Internet gateway attached to the VPC
    InternetGateway,
    /// Main route table of the VPC
    RouteTable,
    /// Security group holding the ingress rules
    SecurityGroup,
    /// The single EC2 instance
    Instance,
}

impl ResourceKind {
    /// Name-tag suffix appended to the namespace value for this kind
    pub fn name_suffix(self) -> &'static str {
        match self {
            ResourceKind::Vpc => "-vpc",
            ResourceKind::Subnet => "-sub",
            ResourceKind::InternetGateway => "-igw",
            ResourceKind::RouteTable => "-rtb",
            ResourceKind::SecurityGroup => "-sg",
            ResourceKind::Instance => "-ec2",
        }
    }
}

/// An identifier returned by a create call, paired with its kind.
///
/// Handles only live for the duration of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceHandle {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
