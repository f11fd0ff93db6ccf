//! Conversions from sandbox tag pairs to EC2 SDK types
//!
//! Every sandbox resource carries two tags from the request's namespace:
//!
//! | Tag Key | Value |
//! |---------|-------|
//! | `<tag_name>` (default `Name`) | `<tag_name_value><suffix>`, e.g. `demo-vpc` |
//! | `<tag_project>` (default `Project`) | `<tag_project_value>` |
//!
//! Teardown filters on the name tag only.

use aws_sdk_ec2::types::{Filter, ResourceType, Tag, TagSpecification};
use netsandbox_common::TagPair;

/// Convert a tag pair into the SDK's `Tag`
pub fn ec2_tag(pair: &TagPair) -> Tag {
    Tag::builder().key(&pair.key).value(&pair.value).build()
}

/// Build an EC2 TagSpecification applying `pairs` at creation time.
pub fn ec2_tag_spec(resource_type: ResourceType, pairs: &[TagPair]) -> TagSpecification {
    pairs
        .iter()
        .fold(
            TagSpecification::builder().resource_type(resource_type),
            |builder, pair| builder.tags(ec2_tag(pair)),
        )
        .build()
}

/// Describe filter matching resources whose tag `key` equals `value`
pub fn tag_filter(pair: &TagPair) -> Filter {
    Filter::builder()
        .name(format!("tag:{}", pair.key))
        .values(&pair.value)
        .build()
}
