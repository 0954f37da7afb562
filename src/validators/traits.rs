//! Core validator traits and interfaces
//!
//! This module defines the seams between the engine and its collaborators:
//! leaf validators, array item typing, and the metadata source.

use super::{Outcome, ValidationContext};
use crate::meta::{FieldMeta, TypeMeta, TypeTag};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A single-field check.
///
/// Validators can be synchronous (simple predicates) or asynchronous
/// (lookups against external state). The engine awaits them one at a time.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validate the value carried by `ctx`
    ///
    /// # Returns
    /// * `Outcome::Valid` - The value passes
    /// * `Outcome::Invalid(message)` - The value fails with a message
    /// * `Outcome::InvalidTree(tree)` - The value fails with a structured error
    async fn validate(&self, ctx: &ValidationContext<'_>) -> Outcome;

    /// Validator name (for logging and debugging)
    fn name(&self) -> &str {
        "custom"
    }
}

/// Derives the type tag of an array item
#[async_trait]
pub trait ItemTypeResolver: Send + Sync {
    async fn resolve(&self, item: &Value, index: usize) -> Option<TypeTag>;
}

/// Source of validation metadata.
///
/// `value` is the object being validated and `type_tag` the explicitly
/// requested type, if any. Returning `None` from [`type_meta`] (or metadata
/// without `dto`) makes the value pass through; returning `None` from
/// [`field_meta`] marks the key as undeclared.
///
/// [`type_meta`]: MetadataProvider::type_meta
/// [`field_meta`]: MetadataProvider::field_meta
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn type_meta(&self, value: &Value, type_tag: Option<&TypeTag>) -> Option<TypeMeta>;

    async fn field_meta(
        &self,
        value: &Value,
        type_tag: Option<&TypeTag>,
        key: &str,
    ) -> Option<FieldMeta>;
}

/// Validator backed by a synchronous closure
pub struct FnValidator<F> {
    name: String,
    check: F,
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&ValidationContext<'_>) -> Outcome + Send + Sync,
{
    async fn validate(&self, ctx: &ValidationContext<'_>) -> Outcome {
        (self.check)(ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap a closure as a validator
///
/// ```
/// use dtoguard::validators::{validator_fn, Outcome};
///
/// let exact = validator_fn(|ctx| Outcome::check(ctx.value == "value", "expected value"));
/// ```
pub fn validator_fn<F>(check: F) -> Arc<dyn Validator>
where
    F: Fn(&ValidationContext<'_>) -> Outcome + Send + Sync + 'static,
{
    named_validator_fn("custom", check)
}

/// Wrap a closure as a validator with a name used in logs
pub fn named_validator_fn<F>(name: &str, check: F) -> Arc<dyn Validator>
where
    F: Fn(&ValidationContext<'_>) -> Outcome + Send + Sync + 'static,
{
    Arc::new(FnValidator {
        name: name.to_string(),
        check,
    })
}

/// Item type resolver backed by a synchronous closure
pub struct FnItemType<F>(F);

#[async_trait]
impl<F> ItemTypeResolver for FnItemType<F>
where
    F: Fn(&Value, usize) -> Option<TypeTag> + Send + Sync,
{
    async fn resolve(&self, item: &Value, index: usize) -> Option<TypeTag> {
        (self.0)(item, index)
    }
}

/// Wrap a closure as an item type resolver
pub fn item_type_fn<F>(resolve: F) -> Arc<dyn ItemTypeResolver>
where
    F: Fn(&Value, usize) -> Option<TypeTag> + Send + Sync + 'static,
{
    Arc::new(FnItemType(resolve))
}

/// Resolver that gives every item the same type tag
pub fn fixed_item_type(tag: impl Into<TypeTag>) -> Arc<dyn ItemTypeResolver> {
    let tag = tag.into();
    item_type_fn(move |_, _| Some(tag.clone()))
}
