//! Built-in leaf validators
//!
//! Simple predicate factories for primitive JSON values. Each factory returns
//! an `Arc<dyn Validator>` ready to be placed in a [`FieldMeta`] chain.
//!
//! [`FieldMeta`]: crate::meta::FieldMeta

mod kind;
mod number;
mod string;

pub use kind::{is_boolean, is_type_of, JsonKind};
pub use number::{is_number, NumberRules};
pub use string::{is_string, StringRules};
