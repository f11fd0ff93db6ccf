//! Configuration types for one invocation

use crate::wait::WaitConfig;
use netsandbox_common::defaults::DEFAULT_REGION;

/// AWS connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsConfig {
    /// AWS region
    pub region: String,
    /// AWS profile name (overrides default credential resolution)
    pub aws_profile: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            aws_profile: None,
        }
    }
}

/// Readiness-wait presets used by both orchestrators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    /// VPC and subnet `available`
    pub network: WaitConfig,
    /// Instance `terminated`
    pub instance: WaitConfig,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            network: WaitConfig::network(),
            instance: WaitConfig::instance(),
        }
    }
}
