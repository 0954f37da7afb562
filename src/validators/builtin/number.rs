//! Numeric validator with range and integer rules

use super::kind::check_kind;
use super::JsonKind;
use crate::validators::*;
use async_trait::async_trait;
use std::sync::Arc;

/// Optional constraints for [`is_number`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberRules {
    pub min: Option<f64>,
    pub max: Option<f64>,

    /// Reject values with a fractional part
    pub int: bool,

    /// Replaces every message this validator produces
    pub error_text: Option<String>,
}

impl NumberRules {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn int(mut self) -> Self {
        self.int = true;
        self
    }

    pub fn error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }
}

struct NumberValidator {
    rules: NumberRules,
}

impl NumberValidator {
    fn fail(&self, message: String) -> Outcome {
        Outcome::Invalid(self.rules.error_text.clone().unwrap_or(message))
    }
}

#[async_trait]
impl Validator for NumberValidator {
    async fn validate(&self, ctx: &ValidationContext<'_>) -> Outcome {
        let kind = check_kind(ctx, JsonKind::Number, self.rules.error_text.as_deref());
        let Some(number) = ctx.value.as_f64() else {
            return kind;
        };

        let label = ctx.display_name();
        if let Some(min) = self.rules.min {
            if number < min {
                return self.fail(format!("\"{}\" does not satisfy min = {}", label, min));
            }
        }
        if let Some(max) = self.rules.max {
            if number > max {
                return self.fail(format!("\"{}\" does not satisfy max = {}", label, max));
            }
        }
        if self.rules.int && number.fract() != 0.0 {
            return self.fail(format!("\"{}\" expected to be integer number", label));
        }

        Outcome::Valid
    }

    fn name(&self) -> &str {
        "number"
    }
}

/// Value must be a number satisfying `rules`
pub fn is_number(rules: NumberRules) -> Arc<dyn Validator> {
    Arc::new(NumberValidator { rules })
}
