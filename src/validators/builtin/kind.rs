//! JSON kind checks

use crate::validators::*;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Primitive kind of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => JsonKind::String,
            Value::Number(_) => JsonKind::Number,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Object(_) => JsonKind::Object,
            Value::Array(_) => JsonKind::Array,
            Value::Null => JsonKind::Null,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonKind::String => "string",
            JsonKind::Number => "number",
            JsonKind::Boolean => "boolean",
            JsonKind::Object => "object",
            JsonKind::Array => "array",
            JsonKind::Null => "null",
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind check shared by the typed validators
pub(super) fn check_kind(ctx: &ValidationContext<'_>, kind: JsonKind, error_text: Option<&str>) -> Outcome {
    if JsonKind::of(ctx.value) == kind {
        Outcome::Valid
    } else {
        Outcome::Invalid(
            error_text
                .map(str::to_string)
                .unwrap_or_else(|| format!("\"{}\" {} expected", ctx.display_name(), kind)),
        )
    }
}

struct KindValidator {
    kind: JsonKind,
    error_text: Option<String>,
}

#[async_trait]
impl Validator for KindValidator {
    async fn validate(&self, ctx: &ValidationContext<'_>) -> Outcome {
        check_kind(ctx, self.kind, self.error_text.as_deref())
    }

    fn name(&self) -> &str {
        self.kind.as_str()
    }
}

/// Value must be of the given JSON kind
pub fn is_type_of(kind: JsonKind, error_text: Option<String>) -> Arc<dyn Validator> {
    Arc::new(KindValidator { kind, error_text })
}

/// Value must be `true` or `false`
pub fn is_boolean(error_text: Option<String>) -> Arc<dyn Validator> {
    is_type_of(JsonKind::Boolean, error_text)
}
