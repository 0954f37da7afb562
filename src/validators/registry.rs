//! Type registry - in-memory metadata provider keyed by type name

use super::*;
use crate::config::{ConfigError, EngineConfig};
use crate::meta::{DtoOptions, FieldMeta, TypeMeta, TypeTag};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Declared shape of one type
#[derive(Debug, Clone, Default)]
pub struct TypeDefinition {
    /// Display name of the type
    pub label: Option<String>,

    /// Structural options (error limit, extra fields)
    pub options: DtoOptions,

    /// Keys checked even when absent from the value
    pub required_props: Vec<String>,

    /// Field rules by key
    pub fields: HashMap<String, FieldMeta>,
}

impl TypeDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn error_limit(mut self, limit: usize) -> Self {
        self.options.error_limit = Some(limit);
        self
    }

    pub fn allow_extra_fields(mut self) -> Self {
        self.options.allow_extra_fields = true;
        self
    }

    pub fn field(mut self, key: impl Into<String>, meta: FieldMeta) -> Self {
        self.fields.insert(key.into(), meta);
        self
    }

    /// Declare a field and list it as a required property
    pub fn required_field(mut self, key: impl Into<String>, meta: FieldMeta) -> Self {
        let key = key.into();
        if !self.required_props.contains(&key) {
            self.required_props.push(key.clone());
        }
        self.fields.insert(key, meta);
        self
    }

    pub fn required_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_props = props.into_iter().map(Into::into).collect();
        self
    }

    fn type_meta(&self, name: &str) -> TypeMeta {
        TypeMeta {
            label: self.label.clone(),
            dto: Some(self.options.clone()),
            type_name: Some(name.to_string()),
            required_props: self.required_props.clone(),
        }
    }
}

/// Registry of type definitions
///
/// Resolves the type of a value from the explicit tag when one is given,
/// otherwise from the value's discriminator field. Unknown names resolve to
/// no metadata, which the engine treats as pass-through.
pub struct TypeRegistry {
    /// Definitions by type name
    types: RwLock<HashMap<String, Arc<TypeDefinition>>>,

    /// Field holding the type name inside data
    discriminator: String,
}

impl TypeRegistry {
    /// Create an empty registry reading the default `_type` discriminator
    pub fn new() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Create an empty registry using the configured discriminator
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
            discriminator: config.discriminator.clone(),
        }
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Register (or replace) a type definition
    ///
    /// # Returns
    /// * `Ok(())` - The type is available for lookups
    /// * `Err(ConfigError)` - The name is empty, or a required property has no field rule
    pub fn register(&self, name: &str, definition: TypeDefinition) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid("type name must not be empty".to_string()));
        }
        if let Some(missing) = definition
            .required_props
            .iter()
            .find(|prop| !definition.fields.contains_key(*prop))
        {
            return Err(ConfigError::Invalid(format!(
                "type '{}' requires '{}' but declares no rule for it",
                name, missing
            )));
        }

        debug!(
            "Registering type: {} ({} fields, {} required)",
            name,
            definition.fields.len(),
            definition.required_props.len()
        );
        if self
            .types
            .write()
            .insert(name.to_string(), Arc::new(definition))
            .is_some()
        {
            info!("🔁 Replaced type definition '{}'", name);
        }
        Ok(())
    }

    /// Register several types at once, stopping at the first invalid one
    pub fn register_all<I>(&self, definitions: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, TypeDefinition)>,
    {
        let mut count = 0;
        for (name, definition) in definitions {
            self.register(&name, definition)?;
            count += 1;
        }
        info!("✅ Registered {} types", count);
        Ok(())
    }

    /// Get a type definition by name
    pub fn get(&self, name: &str) -> Option<Arc<TypeDefinition>> {
        self.types.read().get(name).cloned()
    }

    /// Remove a type definition
    pub fn remove(&self, name: &str) -> bool {
        self.types.write().remove(name).is_some()
    }

    /// Get all registered type names
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve the definition for a value: explicit tag first, then the
    /// discriminator field
    fn resolve(&self, value: &Value, type_tag: Option<&TypeTag>) -> Option<(String, Arc<TypeDefinition>)> {
        let types = self.types.read();
        if let Some(tag) = type_tag {
            if let Some(definition) = types.get(tag.as_str()) {
                return Some((tag.to_string(), Arc::clone(definition)));
            }
        }
        let name = value.get(&self.discriminator)?.as_str()?;
        types
            .get(name)
            .map(|definition| (name.to_string(), Arc::clone(definition)))
    }
}

#[async_trait]
impl MetadataProvider for TypeRegistry {
    async fn type_meta(&self, value: &Value, type_tag: Option<&TypeTag>) -> Option<TypeMeta> {
        let resolved = self.resolve(value, type_tag);
        if resolved.is_none() {
            trace!(?type_tag, "No registered type for value");
        }
        resolved.map(|(name, definition)| definition.type_meta(&name))
    }

    async fn field_meta(
        &self,
        value: &Value,
        type_tag: Option<&TypeTag>,
        key: &str,
    ) -> Option<FieldMeta> {
        let (_, definition) = self.resolve(value, type_tag)?;
        match definition.fields.get(key) {
            Some(meta) => Some(meta.clone()),
            // The discriminator is part of every registered type
            None if key == self.discriminator => Some(FieldMeta::default()),
            None => None,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.type_names())
            .field("discriminator", &self.discriminator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> TypeRegistry {
        let registry = TypeRegistry::new();
        registry
            .register(
                "point",
                TypeDefinition::new()
                    .label("Point")
                    .error_limit(3)
                    .required_field("x", FieldMeta::new().required())
                    .field("y", FieldMeta::new()),
            )
            .unwrap();
        registry
            .register("tagged", TypeDefinition::new().allow_extra_fields())
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_resolves_by_discriminator() {
        let registry = registry();
        let meta = registry
            .type_meta(&json!({ "_type": "point" }), None)
            .await
            .unwrap();

        assert_eq!(meta.type_name.as_deref(), Some("point"));
        assert_eq!(meta.label.as_deref(), Some("Point"));
        assert_eq!(meta.dto.unwrap().error_limit, Some(3));
        assert_eq!(meta.required_props, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_explicit_tag_wins_over_discriminator() {
        let registry = registry();
        let tag = TypeTag::new("tagged");
        let meta = registry
            .type_meta(&json!({ "_type": "point" }), Some(&tag))
            .await
            .unwrap();
        assert_eq!(meta.type_name.as_deref(), Some("tagged"));

        // Unknown explicit tags fall back to the discriminator
        let unknown = TypeTag::new("nope");
        let meta = registry
            .type_meta(&json!({ "_type": "point" }), Some(&unknown))
            .await
            .unwrap();
        assert_eq!(meta.type_name.as_deref(), Some("point"));
    }

    #[tokio::test]
    async fn test_unknown_type_has_no_metadata() {
        let registry = registry();
        assert!(registry.type_meta(&json!({ "_type": "ghost" }), None).await.is_none());
        assert!(registry.type_meta(&json!("scalar"), None).await.is_none());
        assert!(registry
            .field_meta(&json!({ "_type": "ghost" }), None, "x")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_discriminator_is_implicitly_declared() {
        let registry = registry();
        let value = json!({ "_type": "point" });

        assert!(registry.field_meta(&value, None, "_type").await.is_some());
        assert!(registry.field_meta(&value, None, "x").await.unwrap().required);
        assert!(registry.field_meta(&value, None, "z").await.is_none());
    }

    #[tokio::test]
    async fn test_custom_discriminator() {
        let config = EngineConfig {
            discriminator: "kind".to_string(),
            ..EngineConfig::default()
        };
        let registry = TypeRegistry::from_config(&config);
        registry.register("point", TypeDefinition::new()).unwrap();

        assert!(registry.type_meta(&json!({ "kind": "point" }), None).await.is_some());
        assert!(registry.type_meta(&json!({ "_type": "point" }), None).await.is_none());
    }

    #[test]
    fn test_register_rejects_bad_definitions() {
        let registry = TypeRegistry::new();
        assert!(registry.register(" ", TypeDefinition::new()).is_err());
        assert!(registry
            .register("broken", TypeDefinition::new().required_props(["name"]))
            .is_err());
        assert!(registry.type_names().is_empty());
    }

    #[test]
    fn test_register_remove_and_list() {
        let registry = registry();
        assert_eq!(registry.type_names(), vec!["point".to_string(), "tagged".to_string()]);
        assert!(registry.get("point").is_some());
        assert!(registry.remove("point"));
        assert!(!registry.remove("point"));
        assert_eq!(registry.type_names(), vec!["tagged".to_string()]);
    }
}
