//! Validation context - data passed to validators

use crate::meta::{DtoOptions, TypeTag};
use serde_json::Value;

/// Context provided to every validator invocation
///
/// Borrowed from the value tree being validated; validators read it and
/// return an [`Outcome`](super::Outcome).
#[derive(Clone, Debug)]
pub struct ValidationContext<'a> {
    /// Value under validation (`null` never stands in for a missing value;
    /// validators only run for present values)
    pub value: &'a Value,

    /// Field key, or `"<key>[<index>]"` for array items
    pub key: &'a str,

    /// Display name: the field label, falling back to the key
    pub label: &'a str,

    /// Type tag declared for the field, if any
    pub type_tag: Option<&'a TypeTag>,

    /// Parent of the enclosing object
    pub parent: Option<&'a Value>,

    /// Object that holds the field
    pub object: Option<&'a Value>,

    /// Options of the enclosing type
    pub options: &'a DtoOptions,
}

impl<'a> ValidationContext<'a> {
    /// Look up a sibling field on the enclosing object
    pub fn sibling(&self, name: &str) -> Option<&'a Value> {
        self.object.and_then(|object| object.get(name))
    }

    /// Label used in messages; empty when neither label nor key is known
    pub fn display_name(&self) -> &'a str {
        if self.label.is_empty() {
            self.key
        } else {
            self.label
        }
    }
}
