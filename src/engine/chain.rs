//! Sequential validator chain

use super::ValidationState;
use crate::validators::{Outcome, ValidationContext, Validator};
use std::sync::Arc;
use tracing::trace;

/// Run `validators` in order against `ctx`, stopping at the first failure.
///
/// The restore hook runs before every validator, the first one included.
/// An empty chain is `Valid`.
pub async fn run_validators(
    ctx: &ValidationContext<'_>,
    validators: &[Arc<dyn Validator>],
    state: &ValidationState<'_>,
) -> Outcome {
    for validator in validators {
        state.restore();
        let outcome = validator.validate(ctx).await;
        if !outcome.is_valid() {
            trace!(key = %ctx.key, validator = validator.name(), "Validator failed");
            return outcome;
        }
    }
    Outcome::Valid
}
