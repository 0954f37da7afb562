//! Field-level and type-level validation metadata
//!
//! Metadata is never attached to values. A [`MetadataProvider`] hands out
//! fresh [`TypeMeta`] / [`FieldMeta`] records on every lookup and the engine
//! drops them once the call returns.
//!
//! [`MetadataProvider`]: crate::validators::MetadataProvider

use crate::validators::{ItemTypeResolver, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque type tag used to resolve nested-object metadata
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeTag(Arc<str>);

impl TypeTag {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({:?})", &*self.0)
    }
}

/// Per-type options for structural validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoOptions {
    /// Maximum number of errors collected in one object (and, at the root,
    /// across the whole call)
    #[serde(default)]
    pub error_limit: Option<usize>,

    /// Accept keys that have no declared field metadata
    #[serde(default)]
    pub allow_extra_fields: bool,
}

impl DtoOptions {
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = Some(limit);
        self
    }

    pub fn allow_extra_fields(mut self) -> Self {
        self.allow_extra_fields = true;
        self
    }
}

/// Type-level metadata
#[derive(Debug, Clone, Default)]
pub struct TypeMeta {
    /// Display name of the type
    pub label: Option<String>,

    /// Structural options; `None` means the value passes through unchecked
    pub dto: Option<DtoOptions>,

    /// Registered type name
    pub type_name: Option<String>,

    /// Keys checked even when absent from the value
    pub required_props: Vec<String>,
}

impl TypeMeta {
    /// Metadata for a structurally validated type
    pub fn dto(options: DtoOptions) -> Self {
        Self {
            dto: Some(options),
            ..Self::default()
        }
    }

    pub fn with_required_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_props = props.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }
}

/// Length bounds and item typing for array fields
#[derive(Clone, Default)]
pub struct ArrayOptions {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,

    /// Derives the type tag of each item from its value and index
    pub item_type: Option<Arc<dyn ItemTypeResolver>>,
}

impl ArrayOptions {
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn item_type(mut self, resolver: Arc<dyn ItemTypeResolver>) -> Self {
        self.item_type = Some(resolver);
        self
    }
}

impl fmt::Debug for ArrayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayOptions")
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("item_type", &self.item_type.is_some())
            .finish()
    }
}

/// Array declaration of a field
#[derive(Debug, Clone)]
pub enum ArrayType {
    /// Any array is accepted. Items are still checked against
    /// `validators_of_item` when the field declares any.
    Any,

    /// Array with bounds and/or item typing
    Constrained(ArrayOptions),
}

impl ArrayType {
    pub fn options(&self) -> Option<&ArrayOptions> {
        match self {
            ArrayType::Any => None,
            ArrayType::Constrained(options) => Some(options),
        }
    }
}

/// Field-level rule set
#[derive(Clone, Default)]
pub struct FieldMeta {
    pub required: bool,

    /// Display name, falls back to the field key
    pub label: Option<String>,

    /// Ordered validator chain
    pub validators: Vec<Arc<dyn Validator>>,

    /// Chain applied to every item of an array field
    pub validators_of_item: Vec<Arc<dyn Validator>>,

    pub array_type: Option<ArrayType>,

    /// Type tag of a nested object
    pub type_tag: Option<TypeTag>,
}

impl FieldMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn item_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators_of_item.push(validator);
        self
    }

    pub fn array(mut self, array_type: ArrayType) -> Self {
        self.array_type = Some(array_type);
        self
    }

    pub fn nested(mut self, type_tag: impl Into<TypeTag>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }

    /// Label shown in messages: `label`, else the key
    pub fn display_label<'a>(&'a self, key: &'a str) -> &'a str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => key,
        }
    }

    /// Metadata for one array item: the item chain becomes the chain and the
    /// array declaration is dropped
    pub(crate) fn item_meta(&self) -> FieldMeta {
        FieldMeta {
            required: self.required,
            label: self.label.clone(),
            validators: self.validators_of_item.clone(),
            validators_of_item: Vec::new(),
            array_type: None,
            type_tag: None,
        }
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |chain: &[Arc<dyn Validator>]| {
            chain.iter().map(|v| v.name().to_string()).collect::<Vec<_>>()
        };
        f.debug_struct("FieldMeta")
            .field("required", &self.required)
            .field("label", &self.label)
            .field("validators", &names(&self.validators))
            .field("validators_of_item", &names(&self.validators_of_item))
            .field("array_type", &self.array_type)
            .field("type_tag", &self.type_tag)
            .finish()
    }
}
