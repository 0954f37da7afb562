//! Validation outcome and error tree types

use serde::ser::{SerializeMap, SerializeSeq};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Outcome of a single validator, a field, or a whole object
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Value satisfies every rule
    Valid,

    /// Single failure message
    Invalid(String),

    /// Structured failure mirroring the offending substructure
    InvalidTree(ErrorTree),
}

/// Aggregate error whose shape follows the validated value
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorTree {
    /// Errors keyed by field name, in the order the fields were visited
    Object(IndexMap<String, ErrorNode>),

    /// Sparse per-index errors; indices that passed are absent
    Array(BTreeMap<usize, ErrorNode>),
}

/// Leaf or subtree stored inside an [`ErrorTree`]
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorNode {
    Message(String),
    Tree(ErrorTree),
}

impl Outcome {
    /// `Valid` when `ok` holds, otherwise `Invalid(message)`
    pub fn check(ok: bool, message: impl Into<String>) -> Self {
        if ok {
            Outcome::Valid
        } else {
            Outcome::Invalid(message.into())
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid)
    }

    /// True for sparse-array errors produced by array item validation
    pub fn is_array_tree(&self) -> bool {
        matches!(self, Outcome::InvalidTree(ErrorTree::Array(_)))
    }

    /// Convert a failing outcome into a node that can be stored in a tree
    pub fn into_error(self) -> Option<ErrorNode> {
        match self {
            Outcome::Valid => None,
            Outcome::Invalid(message) => Some(ErrorNode::Message(message)),
            Outcome::InvalidTree(tree) => Some(ErrorNode::Tree(tree)),
        }
    }

    /// JSON rendering: `true`, a message string, or the error tree
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Outcome::Valid => serde_json::Value::Bool(true),
            Outcome::Invalid(message) => serde_json::Value::String(message.clone()),
            Outcome::InvalidTree(tree) => tree.to_json(),
        }
    }
}

impl From<ErrorNode> for Outcome {
    fn from(node: ErrorNode) -> Self {
        match node {
            ErrorNode::Message(message) => Outcome::Invalid(message),
            ErrorNode::Tree(tree) => Outcome::InvalidTree(tree),
        }
    }
}

impl ErrorTree {
    /// Number of entries at this level (not counting nested leaves)
    pub fn len(&self) -> usize {
        match self {
            ErrorTree::Object(fields) => fields.len(),
            ErrorTree::Array(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of message leaves in this tree
    pub fn leaf_count(&self) -> usize {
        let nodes: Box<dyn Iterator<Item = &ErrorNode>> = match self {
            ErrorTree::Object(fields) => Box::new(fields.values()),
            ErrorTree::Array(items) => Box::new(items.values()),
        };
        nodes
            .map(|node| match node {
                ErrorNode::Message(_) => 1,
                ErrorNode::Tree(tree) => tree.leaf_count(),
            })
            .sum()
    }

    /// Look up a field error (object trees only)
    pub fn field(&self, key: &str) -> Option<&ErrorNode> {
        match self {
            ErrorTree::Object(fields) => fields.get(key),
            ErrorTree::Array(_) => None,
        }
    }

    /// Look up an item error (array trees only)
    pub fn item(&self, index: usize) -> Option<&ErrorNode> {
        match self {
            ErrorTree::Array(items) => items.get(&index),
            ErrorTree::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl ErrorNode {
    pub fn as_message(&self) -> Option<&str> {
        match self {
            ErrorNode::Message(message) => Some(message),
            ErrorNode::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&ErrorTree> {
        match self {
            ErrorNode::Tree(tree) => Some(tree),
            ErrorNode::Message(_) => None,
        }
    }
}

impl Serialize for ErrorTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorTree::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, node) in fields {
                    map.serialize_entry(key, node)?;
                }
                map.end()
            }
            ErrorTree::Array(items) => {
                // Holes render as null so indices line up with the input array
                let len = items.keys().next_back().map_or(0, |last| last + 1);
                let mut seq = serializer.serialize_seq(Some(len))?;
                for index in 0..len {
                    seq.serialize_element(&items.get(&index))?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for ErrorNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ErrorNode::Message(message) => serializer.serialize_str(message),
            ErrorNode::Tree(tree) => tree.serialize(serializer),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Valid => serializer.serialize_bool(true),
            Outcome::Invalid(message) => serializer.serialize_str(message),
            Outcome::InvalidTree(tree) => tree.serialize(serializer),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Valid => write!(f, "valid"),
            Outcome::Invalid(message) => write!(f, "{}", message),
            Outcome::InvalidTree(tree) => write!(f, "{}", tree.to_json()),
        }
    }
}
