//! Sandbox request types
//!
//! A request arrives as a loosely-shaped JSON object ([`RequestEvent`]) in
//! which every field is optional. Validation applies the documented defaults,
//! checks the mode and normalizes the ingress rules into a [`Request`] that the
//! orchestrators consume.

use crate::defaults::{
    DEFAULT_INGRESS_CIDR, default_ami_id, default_instance_type, default_key_pair, default_state,
    default_subnet_cidr, default_tag_name, default_tag_name_value, default_tag_project,
    default_tag_project_value, default_vpc_cidr,
};
use crate::error::RequestError;
use crate::tags::TagNamespace;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Which phase an invocation runs
///
/// Only the exact lowercase names parse; `STOP` is an unknown mode, not a
/// teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Provision the sandbox
    Start,
    /// Tear the sandbox down
    Stop,
}

/// IPv4 source range of an ingress rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct IpRangeSpec {
    pub cidr_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// IPv6 source range of an ingress rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Ipv6RangeSpec {
    pub cidr_ipv6: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Another security group as the source of an ingress rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct UserIdGroupPairSpec {
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Managed prefix list as the source of an ingress rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PrefixListIdSpec {
    pub prefix_list_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One inbound security group rule, in the provider's `IpPermissions` shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct IngressRule {
    /// `tcp`, `udp`, `icmp` or `-1` for all traffic
    pub ip_protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_ranges: Vec<IpRangeSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6_ranges: Vec<Ipv6RangeSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_id_group_pairs: Vec<UserIdGroupPairSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_list_ids: Vec<PrefixListIdSpec>,
}

impl IngressRule {
    /// TCP rule for a single port open to one IPv4 range
    pub fn tcp(port: i32, cidr_ip: impl Into<String>) -> Self {
        Self {
            ip_protocol: "tcp".to_string(),
            from_port: Some(port),
            to_port: Some(port),
            ip_ranges: vec![IpRangeSpec {
                cidr_ip: cidr_ip.into(),
                description: None,
            }],
            ipv6_ranges: Vec::new(),
            user_id_group_pairs: Vec::new(),
            prefix_list_ids: Vec::new(),
        }
    }
}

/// Default ingress: SSH and HTTP from anywhere
pub fn default_ingress_rules() -> IngressRulesInput {
    IngressRulesInput::Flat(vec![
        IngressRule::tcp(22, DEFAULT_INGRESS_CIDR),
        IngressRule::tcp(80, DEFAULT_INGRESS_CIDR),
    ])
}

/// Ingress rules as they may arrive on the wire.
///
/// Some callers wrap the rule list in one extra list. That shape is accepted
/// only when it is unambiguous (exactly one inner list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IngressRulesInput {
    Flat(Vec<IngressRule>),
    Nested(Vec<Vec<IngressRule>>),
}

// The shape is picked from the JSON first so a bad rule reports its own
// field error instead of "did not match any variant".
impl<'de> Deserialize<'de> for IngressRulesInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let nested = value.as_array().is_some_and(|items| {
            !items.is_empty() && items.iter().all(serde_json::Value::is_array)
        });

        let parsed = if nested {
            serde_json::from_value(value).map(IngressRulesInput::Nested)
        } else {
            serde_json::from_value(value).map(IngressRulesInput::Flat)
        };
        parsed.map_err(|e| D::Error::custom(format!("invalid ingress_rules: {e}")))
    }
}

impl IngressRulesInput {
    /// Normalize to a flat, ordered rule list.
    pub fn into_flat(self) -> Result<Vec<IngressRule>, RequestError> {
        match self {
            IngressRulesInput::Flat(rules) => Ok(rules),
            IngressRulesInput::Nested(mut lists) => match lists.len() {
                0 => Ok(Vec::new()),
                1 => {
                    warn!("ingress_rules arrived wrapped in an extra list; unwrapping one level");
                    Ok(lists.remove(0))
                }
                n => Err(RequestError::NestedIngressRules(n)),
            },
        }
    }
}

/// Raw request as received by the dispatcher. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default = "default_vpc_cidr")]
    pub vpc_cidr: String,

    #[serde(default = "default_subnet_cidr")]
    pub subnet_cidr: String,

    #[serde(default = "default_instance_type")]
    pub instance_type: String,

    #[serde(default = "default_ami_id")]
    pub ami_id: String,

    /// SSH key pair name; `null` or `""` launches without one
    #[serde(default = "default_key_pair")]
    pub key_pair: Option<String>,

    #[serde(default = "default_ingress_rules")]
    pub ingress_rules: IngressRulesInput,

    #[serde(default = "default_tag_name")]
    pub tag_name: String,

    #[serde(default = "default_tag_name_value")]
    pub tag_name_value: String,

    #[serde(default = "default_tag_project")]
    pub tag_project: String,

    #[serde(default = "default_tag_project_value")]
    pub tag_project_value: String,

    /// Placement for the subnet and instance; the provider chooses when absent
    #[serde(default)]
    pub availability_zone: Option<String>,
}

impl Default for RequestEvent {
    fn default() -> Self {
        Self {
            state: default_state(),
            vpc_cidr: default_vpc_cidr(),
            subnet_cidr: default_subnet_cidr(),
            instance_type: default_instance_type(),
            ami_id: default_ami_id(),
            key_pair: default_key_pair(),
            ingress_rules: default_ingress_rules(),
            tag_name: default_tag_name(),
            tag_name_value: default_tag_name_value(),
            tag_project: default_tag_project(),
            tag_project_value: default_tag_project_value(),
            availability_zone: None,
        }
    }
}

impl RequestEvent {
    /// Parse a request from a JSON value. `null` means "all defaults".
    pub fn from_value(value: serde_json::Value) -> Result<Self, RequestError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Check the mode, normalize ingress rules and apply empty-means-absent rules.
    pub fn validate(self) -> Result<Request, RequestError> {
        let mode = self
            .state
            .parse::<Mode>()
            .map_err(|_| RequestError::UnknownMode(self.state.clone()))?;

        for (field, value) in [
            ("tag_name", &self.tag_name),
            ("tag_name_value", &self.tag_name_value),
            ("tag_project", &self.tag_project),
            ("tag_project_value", &self.tag_project_value),
        ] {
            if value.trim().is_empty() {
                return Err(RequestError::EmptyTagField(field));
            }
        }

        let ingress_rules = self.ingress_rules.into_flat()?;

        Ok(Request {
            mode,
            network: NetworkSpec {
                vpc_cidr: self.vpc_cidr,
                subnet_cidr: self.subnet_cidr,
                availability_zone: self.availability_zone.filter(|az| !az.is_empty()),
            },
            compute: ComputeSpec {
                ami_id: self.ami_id,
                instance_type: self.instance_type,
                key_pair: self.key_pair.filter(|k| !k.is_empty()),
            },
            ingress_rules,
            tags: TagNamespace {
                name_key: self.tag_name,
                name_value: self.tag_name_value,
                project_key: self.tag_project,
                project_value: self.tag_project_value,
            },
        })
    }
}

/// Network address layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    pub vpc_cidr: String,
    pub subnet_cidr: String,
    pub availability_zone: Option<String>,
}

/// Compute instance parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeSpec {
    pub ami_id: String,
    pub instance_type: String,
    pub key_pair: Option<String>,
}

/// Validated request consumed by the orchestrators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub mode: Mode,
    pub network: NetworkSpec,
    pub compute: ComputeSpec,
    pub ingress_rules: Vec<IngressRule>,
    pub tags: TagNamespace,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            mode: Mode::Stop,
            network: NetworkSpec {
                vpc_cidr: default_vpc_cidr(),
                subnet_cidr: default_subnet_cidr(),
                availability_zone: None,
            },
            compute: ComputeSpec {
                ami_id: default_ami_id(),
                instance_type: default_instance_type(),
                key_pair: default_key_pair(),
            },
            ingress_rules: vec![
                IngressRule::tcp(22, DEFAULT_INGRESS_CIDR),
                IngressRule::tcp(80, DEFAULT_INGRESS_CIDR),
            ],
            tags: TagNamespace::default(),
        }
    }
}
