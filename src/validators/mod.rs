//! Validator framework
//!
//! This module provides the pieces the engine is assembled from: the
//! [`Validator`] trait for single-field checks, the [`MetadataProvider`] trait
//! the engine pulls rules from, the [`Outcome`] / [`ErrorTree`] result types,
//! built-in leaf validators, and an in-memory [`TypeRegistry`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │       Metadata Provider                 │
//! ├─────────────────────────────────────────┤
//! │  • Resolve type by tag / discriminator  │
//! │  • Hand out per-field rule sets         │
//! └────────┬────────────────────────────────┘
//!          │
//!          ├──> Built-in Validators (string, number, boolean, kind)
//!          ├──> Closure Validators (validator_fn)
//!          └──> Custom async Validators
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use dtoguard::meta::FieldMeta;
//! use dtoguard::validators::builtin::{is_number, NumberRules};
//! use dtoguard::validators::{TypeDefinition, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! registry
//!     .register(
//!         "person",
//!         TypeDefinition::new()
//!             .field("age", FieldMeta::new().validator(is_number(NumberRules::default().min(12.0)))),
//!     )
//!     .unwrap();
//! ```

pub mod builtin;
pub mod context;
pub mod registry;
pub mod result;
pub mod traits;

// Re-export commonly used types
pub use context::ValidationContext;
pub use registry::{TypeDefinition, TypeRegistry};
pub use result::{ErrorNode, ErrorTree, Outcome};
pub use traits::{
    fixed_item_type, item_type_fn, named_validator_fn, validator_fn, ItemTypeResolver,
    MetadataProvider, Validator,
};
