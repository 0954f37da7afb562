//! Object-level validation

use super::budget::LocalBudget;
use super::{BoxFuture, Engine, FieldScope, ValidationState};
use crate::meta::TypeTag;
use crate::validators::builtin::JsonKind;
use crate::validators::{ErrorTree, Outcome};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

impl Engine {
    pub(super) fn dto<'a, 'h: 'a>(
        &'a self,
        value: &'a Value,
        type_tag: Option<&'a TypeTag>,
        parent: Option<&'a Value>,
        state: &'a mut ValidationState<'h>,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let Some(type_meta) = self.provider.type_meta(value, type_tag).await else {
                trace!(?type_tag, "No type metadata, passing through");
                return Outcome::Valid;
            };
            let Some(options) = type_meta.dto else {
                trace!(?type_tag, "Type is not structurally validated");
                return Outcome::Valid;
            };
            let Value::Object(object) = value else {
                return Outcome::Invalid(format!(
                    "Expected object, got \"{}\"",
                    JsonKind::of(value)
                ));
            };

            let error_limit = self.config.resolve_error_limit(options.error_limit);
            state.establish_global_limit(error_limit);
            let mut budget = LocalBudget::new(error_limit);

            // Present keys first, then required keys the value lacks
            let missing = type_meta
                .required_props
                .iter()
                .filter(|prop| !object.contains_key(prop.as_str()));
            let keys: Vec<&str> = object
                .keys()
                .chain(missing)
                .map(String::as_str)
                .collect();

            let scope = FieldScope {
                dto_options: Some(&options),
                object: Some(value),
                parent,
            };
            let mut errors = IndexMap::new();

            for key in keys {
                let field_meta = self.provider.field_meta(value, type_tag, key).await;
                let mark = state.mark();
                let outcome = self
                    .param(object.get(key), field_meta.as_ref(), key, scope, state)
                    .await;
                if outcome.is_valid() {
                    continue;
                }

                // Sparse arrays did their own accounting per item
                let counts_locally = !outcome.is_array_tree();
                if let Some(node) = outcome.into_error() {
                    errors.insert(key.to_string(), node);
                }
                if counts_locally {
                    budget.record();
                }
                state.record_since(mark);

                if budget.exhausted() || state.global_exhausted() {
                    debug!(
                        type_name = type_meta.type_name.as_deref().unwrap_or("?"),
                        label = type_meta.label.as_deref().unwrap_or("-"),
                        local = budget.count(),
                        global = state.global_count(),
                        "Error budget exhausted, skipping remaining fields"
                    );
                    break;
                }
            }

            if errors.is_empty() {
                Outcome::Valid
            } else {
                Outcome::InvalidTree(ErrorTree::Object(errors))
            }
        })
    }
}
