//! Structured result returned by every invocation

use serde::{Deserialize, Serialize};

/// Identifiers touched by an invocation.
///
/// For `start` these are the created resources; for `stop` the resources that
/// were resolved from tags (absent when nothing matched).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIds {
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub instance_id: Option<String>,
    pub security_group_id: Option<String>,
    pub internet_gateway_id: Option<String>,
    pub route_table_id: Option<String>,
}

impl ResourceIds {
    /// True when no identifier is present
    pub fn is_empty(&self) -> bool {
        self.vpc_id.is_none()
            && self.subnet_id.is_none()
            && self.instance_id.is_none()
            && self.security_group_id.is_none()
            && self.internet_gateway_id.is_none()
            && self.route_table_id.is_none()
    }
}

/// Outcome of one invocation, serialized with a `status` discriminator:
///
/// ```json
/// {"status": "SUCCESS", "vpc_id": "vpc-1", "subnet_id": "subnet-1", ...}
/// {"status": "ERROR", "message": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum InvocationResult {
    #[serde(rename = "SUCCESS")]
    Success(ResourceIds),
    #[serde(rename = "ERROR")]
    Error { message: String },
}

impl InvocationResult {
    pub fn success(ids: ResourceIds) -> Self {
        Self::Success(ids)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Identifiers on success, `None` on error
    pub fn ids(&self) -> Option<&ResourceIds> {
        match self {
            Self::Success(ids) => Some(ids),
            Self::Error { .. } => None,
        }
    }
}
