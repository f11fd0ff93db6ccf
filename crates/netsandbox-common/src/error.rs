//! Request validation errors

use thiserror::Error;

/// Errors raised while turning a raw request into a validated [`Request`](crate::Request)
#[derive(Debug, Error)]
pub enum RequestError {
    /// Request body is not valid JSON or has the wrong shape
    #[error("Failed to parse request: {0}")]
    Parse(#[from] serde_json::Error),

    /// `state` is neither `start` nor `stop`
    #[error("state must be 'start' or 'stop', got: '{0}'")]
    UnknownMode(String),

    /// `ingress_rules` holds several nested rule lists
    #[error("ingress_rules must be a flat list of rules, got {0} nested lists")]
    NestedIngressRules(usize),

    /// A tag key or value that scopes discovery is empty
    #[error("{0} cannot be empty")]
    EmptyTagField(&'static str),
}
