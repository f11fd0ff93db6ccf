//! Tag namespace conventions for sandbox resources
//!
//! A sandbox is identified by two tags applied to every resource:
//!
//! | Tag Key | Value |
//! |---------|-------|
//! | `<tag_name>` (default `Name`) | `<tag_name_value>` plus a per-kind suffix (`-vpc`, `-sub`, ...) |
//! | `<tag_project>` (default `Project`) | `<tag_project_value>` |
//!
//! The name tag is what teardown uses to find resources again, so the
//! namespace value must be unique among everything visible to the caller.

use crate::defaults::{
    DEFAULT_TAG_NAME, DEFAULT_TAG_NAME_VALUE, DEFAULT_TAG_PROJECT, DEFAULT_TAG_PROJECT_VALUE,
};
use crate::resource_kind::ResourceKind;

/// A single key/value tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagPair {
    pub key: String,
    pub value: String,
}

impl TagPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Name and project tags that scope one sandbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNamespace {
    pub name_key: String,
    pub name_value: String,
    pub project_key: String,
    pub project_value: String,
}

impl Default for TagNamespace {
    fn default() -> Self {
        Self {
            name_key: DEFAULT_TAG_NAME.to_string(),
            name_value: DEFAULT_TAG_NAME_VALUE.to_string(),
            project_key: DEFAULT_TAG_PROJECT.to_string(),
            project_value: DEFAULT_TAG_PROJECT_VALUE.to_string(),
        }
    }
}

impl TagNamespace {
    /// Suffix-qualified name for a resource of the given kind (e.g. `demo-vpc`)
    pub fn name_for(&self, kind: ResourceKind) -> String {
        format!("{}{}", self.name_value, kind.name_suffix())
    }

    /// Name tag for a resource of the given kind
    pub fn name_tag(&self, kind: ResourceKind) -> TagPair {
        TagPair::new(&self.name_key, self.name_for(kind))
    }

    /// Project tag shared by every resource in the sandbox
    pub fn project_tag(&self) -> TagPair {
        TagPair::new(&self.project_key, &self.project_value)
    }

    /// Full tag set applied to a resource of the given kind
    pub fn tags_for(&self, kind: ResourceKind) -> Vec<TagPair> {
        vec![self.name_tag(kind), self.project_tag()]
    }
}
