//! Default configuration values for sandbox requests and readiness waits
//!
//! These constants are the documented defaults applied to every optional
//! request field, plus the polling presets used by the readiness waiter.

/// Default invocation mode when the request omits `state`
pub const DEFAULT_STATE: &str = "stop";

/// Default VPC address block
pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";

/// Default subnet address block
pub const DEFAULT_SUBNET_CIDR: &str = "10.0.1.0/24";

/// Default EC2 instance type
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";

/// Default boot image (Ubuntu 24.04, us-east-1)
pub const DEFAULT_AMI_ID: &str = "ami-020cba7c55df1f615";

/// Default SSH key pair name
pub const DEFAULT_KEY_PAIR: &str = "netsandbox-key";

/// Default name-tag key
pub const DEFAULT_TAG_NAME: &str = "Name";

/// Default name-tag value (resource suffixes are appended to it)
pub const DEFAULT_TAG_NAME_VALUE: &str = "netsandbox";

/// Default project-tag key
pub const DEFAULT_TAG_PROJECT: &str = "Project";

/// Default project-tag value
pub const DEFAULT_TAG_PROJECT_VALUE: &str = "netsandbox";

/// Default AWS region for the CLI
pub const DEFAULT_REGION: &str = "us-east-1";

/// Destination of the route that sends subnet traffic to the internet gateway
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// Source range of the default SSH and HTTP ingress rules
pub const DEFAULT_INGRESS_CIDR: &str = "0.0.0.0/0";

/// Poll interval for VPC and subnet readiness (seconds)
pub const NETWORK_POLL_INTERVAL_SECS: u64 = 3;

/// Timeout for VPC and subnet readiness (seconds)
pub const NETWORK_WAIT_TIMEOUT_SECS: u64 = 120;

/// Poll interval for instance lifecycle transitions (seconds)
pub const INSTANCE_POLL_INTERVAL_SECS: u64 = 10;

/// Timeout for instance lifecycle transitions (seconds)
pub const INSTANCE_WAIT_TIMEOUT_SECS: u64 = 300;

// Serde default functions for struct field defaults

pub fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

pub fn default_vpc_cidr() -> String {
    DEFAULT_VPC_CIDR.to_string()
}

pub fn default_subnet_cidr() -> String {
    DEFAULT_SUBNET_CIDR.to_string()
}

pub fn default_instance_type() -> String {
    DEFAULT_INSTANCE_TYPE.to_string()
}

pub fn default_ami_id() -> String {
    DEFAULT_AMI_ID.to_string()
}

/// Returns the default key pair (wrapped so `null` in a request clears it)
pub fn default_key_pair() -> Option<String> {
    Some(DEFAULT_KEY_PAIR.to_string())
}

pub fn default_tag_name() -> String {
    DEFAULT_TAG_NAME.to_string()
}

pub fn default_tag_name_value() -> String {
    DEFAULT_TAG_NAME_VALUE.to_string()
}

pub fn default_tag_project() -> String {
    DEFAULT_TAG_PROJECT.to_string()
}

pub fn default_tag_project_value() -> String {
    DEFAULT_TAG_PROJECT_VALUE.to_string()
}
