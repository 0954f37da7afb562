//! Recursive validation engine
//!
//! [`Engine::validate_dto`] validates an object against its type metadata and
//! hands each field to [`Engine::validate_param`], which in turn recurses into
//! nested objects and array items. Both share one [`ValidationState`] per root
//! call, so error limits cut off the whole tree deterministically.

mod budget;
mod chain;
mod dto;
mod param;

pub use budget::{Mark, RestoreHook, ValidationState};
pub use chain::run_validators;

use crate::config::EngineConfig;
use crate::meta::{DtoOptions, FieldMeta, TypeTag};
use crate::validators::{MetadataProvider, Outcome};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future used by the mutually recursive validation steps
pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Options applied when a field is validated outside any object
pub(crate) static NO_OPTIONS: DtoOptions = DtoOptions {
    error_limit: None,
    allow_extra_fields: false,
};

/// Where a field sits: the options of its enclosing type, the object that
/// holds it, and that object's parent
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldScope<'a> {
    pub dto_options: Option<&'a DtoOptions>,
    pub object: Option<&'a Value>,
    pub parent: Option<&'a Value>,
}

impl<'a> FieldScope<'a> {
    /// Scope of a field that belongs to no object
    pub fn standalone() -> Self {
        Self::default()
    }
}

/// Metadata-driven validator for nested JSON values
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    provider: Arc<dyn MetadataProvider>,
}

impl Engine {
    pub fn new(config: EngineConfig, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { config, provider }
    }

    /// Engine with default configuration
    pub fn with_provider(provider: Arc<dyn MetadataProvider>) -> Self {
        Self::new(EngineConfig::default(), provider)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a root value, resolving its type from the data itself
    pub async fn validate(&self, value: &Value) -> Outcome {
        let mut state = ValidationState::new();
        self.validate_dto(value, None, None, &mut state).await
    }

    /// Validate a root value as the given type
    pub async fn validate_as(&self, value: &Value, type_tag: &TypeTag) -> Outcome {
        let mut state = ValidationState::new();
        self.validate_dto(value, Some(type_tag), None, &mut state).await
    }

    /// Validate a root value, running `hook` before every validator and every
    /// array item
    pub async fn validate_with_hook(
        &self,
        value: &Value,
        type_tag: Option<&TypeTag>,
        hook: &RestoreHook<'_>,
    ) -> Outcome {
        let mut state = ValidationState::with_restore_hook(hook);
        self.validate_dto(value, type_tag, None, &mut state).await
    }

    /// Validate one value against field metadata outside any object
    ///
    /// `None` stands for a missing value.
    pub async fn check_param(&self, value: Option<&Value>, meta: &FieldMeta, key: &str) -> Outcome {
        let mut state = ValidationState::new();
        self.validate_param(value, Some(meta), key, FieldScope::standalone(), &mut state)
            .await
    }

    /// Object-level validation
    ///
    /// Returns `Valid`, `Invalid` when the value is not an object, or an
    /// object error tree keyed by field.
    pub async fn validate_dto(
        &self,
        value: &Value,
        type_tag: Option<&TypeTag>,
        parent: Option<&Value>,
        state: &mut ValidationState<'_>,
    ) -> Outcome {
        self.dto(value, type_tag, parent, state).await
    }

    /// Field-level validation
    ///
    /// `meta` of `None` means the provider declared no rule for `key`.
    pub async fn validate_param(
        &self,
        value: Option<&Value>,
        meta: Option<&FieldMeta>,
        key: &str,
        scope: FieldScope<'_>,
        state: &mut ValidationState<'_>,
    ) -> Outcome {
        self.param(value, meta, key, scope, state).await
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
