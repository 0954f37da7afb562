//! Field-level validation

use super::budget::LocalBudget;
use super::{run_validators, BoxFuture, Engine, FieldScope, ValidationState, NO_OPTIONS};
use crate::meta::FieldMeta;
use crate::validators::{ErrorTree, ItemTypeResolver, Outcome, ValidationContext};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

impl Engine {
    pub(super) fn param<'a, 'h: 'a>(
        &'a self,
        value: Option<&'a Value>,
        meta: Option<&'a FieldMeta>,
        key: &'a str,
        scope: FieldScope<'a>,
        state: &'a mut ValidationState<'h>,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let error_limit = self
                .config
                .resolve_error_limit(scope.dto_options.and_then(|options| options.error_limit));
            state.establish_global_limit(error_limit);

            let label = meta.map_or(key, |meta| meta.display_label(key));

            // Required fires before anything else, null counts as missing
            if meta.is_some_and(|meta| meta.required) && matches!(value, None | Some(Value::Null)) {
                return Outcome::Invalid(format!("Field \"{}\" is required", label));
            }
            let Some(value) = value else {
                return Outcome::Valid;
            };

            if let Some(meta) = meta.filter(|meta| !meta.validators.is_empty()) {
                let ctx = ValidationContext {
                    value,
                    key,
                    label,
                    type_tag: meta.type_tag.as_ref(),
                    parent: scope.parent,
                    object: scope.object,
                    options: scope.dto_options.unwrap_or(&NO_OPTIONS),
                };
                let outcome = run_validators(&ctx, &meta.validators, state).await;
                if !outcome.is_valid() {
                    return outcome;
                }
            }

            let Some(meta) = meta else {
                return match scope.dto_options {
                    Some(options) if !options.allow_extra_fields => {
                        trace!(%key, "Undeclared field");
                        Outcome::Invalid(format!("Unexpected field \"{}\"", key))
                    }
                    _ => Outcome::Valid,
                };
            };

            if let Some(array_type) = &meta.array_type {
                let Value::Array(items) = value else {
                    return Outcome::Invalid(format!("\"{}\" array expected", label));
                };

                let options = array_type.options();
                if let Some(options) = options {
                    if let Some(min) = options.min_length.filter(|min| items.len() < *min) {
                        return Outcome::Invalid(format!(
                            "\"{}\" does not satisfy min length {}",
                            label, min
                        ));
                    }
                    if let Some(max) = options.max_length.filter(|max| items.len() > *max) {
                        return Outcome::Invalid(format!(
                            "\"{}\" does not satisfy max length {}",
                            label, max
                        ));
                    }
                }

                let item_type = options.and_then(|options| options.item_type.as_ref());
                if item_type.is_some() || !meta.validators_of_item.is_empty() {
                    return self
                        .items(items, meta, key, item_type, error_limit, scope, state)
                        .await;
                }
                return Outcome::Valid;
            }

            if let Some(type_tag) = &meta.type_tag {
                return self.dto(value, Some(type_tag), scope.object, state).await;
            }

            Outcome::Valid
        })
    }

    /// Re-validate every array item, collecting a sparse error array
    #[allow(clippy::too_many_arguments)]
    async fn items(
        &self,
        items: &[Value],
        meta: &FieldMeta,
        key: &str,
        item_type: Option<&Arc<dyn ItemTypeResolver>>,
        error_limit: usize,
        scope: FieldScope<'_>,
        state: &mut ValidationState<'_>,
    ) -> Outcome {
        let mut budget = LocalBudget::new(error_limit);
        let mut errors = BTreeMap::new();
        let mut item_meta = meta.item_meta();

        for (index, item) in items.iter().enumerate() {
            state.restore();
            item_meta.type_tag = match item_type {
                Some(resolver) => resolver.resolve(item, index).await,
                None => None,
            };

            let item_key = format!("{}[{}]", key, index);
            let mark = state.mark();
            let outcome = self
                .param(Some(item), Some(&item_meta), &item_key, scope, state)
                .await;

            if let Some(node) = outcome.into_error() {
                errors.insert(index, node);
                budget.record();
                state.record_since(mark);
                if budget.exhausted() || state.global_exhausted() {
                    debug!(
                        %key,
                        local = budget.count(),
                        global = state.global_count(),
                        "Error budget exhausted in array"
                    );
                    break;
                }
            }
        }

        if errors.is_empty() {
            Outcome::Valid
        } else {
            Outcome::InvalidTree(ErrorTree::Array(errors))
        }
    }
}
