//! netsandbox-common - Shared types and conventions
//!
//! This crate provides the request, result and tagging types shared by the
//! orchestrator and its test helpers, without any AWS SDK dependencies.
//!
//! ## Modules
//!
//! - [`defaults`]: Default request values and readiness-wait presets
//! - [`error`]: Request validation errors
//! - [`invocation_result`]: The `SUCCESS`/`ERROR` result shape
//! - [`request`]: Raw and validated request types
//! - [`resource_kind`]: Resource kinds and their name-tag suffixes
//! - [`tags`]: Tag namespace conventions for discovery

pub mod defaults;
pub mod error;
pub mod invocation_result;
pub mod request;
pub mod resource_kind;
pub mod tags;

// Re-export commonly used types
pub use error::RequestError;
pub use invocation_result::{InvocationResult, ResourceIds};
pub use request::{
    ComputeSpec, IngressRule, IngressRulesInput, IpRangeSpec, Ipv6RangeSpec, Mode, NetworkSpec,
    PrefixListIdSpec, Request, RequestEvent, UserIdGroupPairSpec,
};
pub use resource_kind::{ResourceHandle, ResourceKind};
pub use tags::{TagNamespace, TagPair};
