//! # dtoguard - metadata-driven validation of nested JSON values
//!
//! Validation rules are not attached to the data. They are resolved on demand
//! from a [`MetadataProvider`], keyed by a type tag carried in the data (a
//! `"_type"` discriminator) or passed explicitly. The result mirrors the input:
//! scalar fields produce messages, nested objects produce nested error objects,
//! and arrays produce sparse per-index errors.
//!
//! ## Features
//! - Async validator chains that stop at the first failure
//! - Required fields, undeclared-field detection, array bounds and item typing
//! - Per-object and global error limits with deterministic cutoffs
//! - Restore hook invoked before every validator and every array item
//! - Built-in string/number/boolean validators and an in-memory type registry
//!
//! ## Example
//! ```rust
//! use dtoguard::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), dtoguard::config::ConfigError> {
//! let registry = TypeRegistry::new();
//! registry.register(
//!     "person",
//!     TypeDefinition::new()
//!         .required_field("name", FieldMeta::new().required().validator(is_string(StringRules::default())))
//!         .field("age", FieldMeta::new().validator(is_number(NumberRules::default().int().min(12.0)))),
//! )?;
//!
//! let engine = Engine::with_provider(Arc::new(registry));
//! let outcome = engine.validate(&json!({ "_type": "person", "age": 5 })).await;
//! assert_eq!(
//!     outcome.to_json(),
//!     json!({ "age": "\"age\" does not satisfy min = 12", "name": "Field \"name\" is required" })
//! );
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod meta;
pub mod validators;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, FieldScope, ValidationState};
pub use meta::{ArrayOptions, ArrayType, DtoOptions, FieldMeta, TypeMeta, TypeTag};
pub use validators::{ErrorNode, ErrorTree, MetadataProvider, Outcome, ValidationContext, Validator};

/// Everything needed to declare types and run validation
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Engine, FieldScope, ValidationState};
    pub use crate::meta::{ArrayOptions, ArrayType, DtoOptions, FieldMeta, TypeMeta, TypeTag};
    pub use crate::validators::builtin::{
        is_boolean, is_number, is_string, is_type_of, JsonKind, NumberRules, StringRules,
    };
    pub use crate::validators::{
        fixed_item_type, item_type_fn, named_validator_fn, validator_fn, ErrorNode, ErrorTree,
        ItemTypeResolver, MetadataProvider, Outcome, TypeDefinition, TypeRegistry,
        ValidationContext, Validator,
    };
}
