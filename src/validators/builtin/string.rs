//! String validator with length and pattern rules

use super::kind::check_kind;
use super::JsonKind;
use crate::config::ConfigError;
use crate::validators::*;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// Optional constraints for [`is_string`]
#[derive(Debug, Clone, Default)]
pub struct StringRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub regex: Option<Regex>,

    /// Replaces every message this validator produces
    pub error_text: Option<String>,
}

impl StringRules {
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Compile and attach a pattern
    pub fn pattern(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::Invalid(format!(
            "invalid string pattern '{}': {}",
            pattern, e
        )))?;
        self.regex = Some(regex);
        Ok(self)
    }

    pub fn error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = Some(text.into());
        self
    }
}

struct StringValidator {
    rules: StringRules,
}

impl StringValidator {
    fn fail(&self, message: String) -> Outcome {
        Outcome::Invalid(self.rules.error_text.clone().unwrap_or(message))
    }
}

#[async_trait]
impl Validator for StringValidator {
    async fn validate(&self, ctx: &ValidationContext<'_>) -> Outcome {
        let kind = check_kind(ctx, JsonKind::String, self.rules.error_text.as_deref());
        let Some(text) = ctx.value.as_str() else {
            return kind;
        };

        let label = ctx.display_name();
        let length = text.chars().count();
        if let Some(min) = self.rules.min_length {
            if length < min {
                return self.fail(format!("\"{}\" does not satisfy min length {}", label, min));
            }
        }
        if let Some(max) = self.rules.max_length {
            if length > max {
                return self.fail(format!("\"{}\" does not satisfy max length {}", label, max));
            }
        }
        if let Some(regex) = &self.rules.regex {
            if !regex.is_match(text) {
                return self.fail(format!(
                    "\"{}\" does not satisfy regex /{}/",
                    label,
                    regex.as_str()
                ));
            }
        }

        Outcome::Valid
    }

    fn name(&self) -> &str {
        "string"
    }
}

/// Value must be a string satisfying `rules`
pub fn is_string(rules: StringRules) -> Arc<dyn Validator> {
    Arc::new(StringValidator { rules })
}
