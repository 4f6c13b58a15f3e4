// File: src/validator.rs
// Purpose: Validation runtime: rule evaluation, after hooks and results

use crate::error::ValidationFailure;
use crate::messages::{MessageBag, Messages};
use crate::path::FieldPath;
use crate::rules::{Rule, RuleContext, RuleSet};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Cross-field check run after every field rule, in registration order
pub type AfterHook = dyn Fn(&Value, &mut MessageBag) + Send + Sync;

/// Outcome of validating one record
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The validated subset of the input
    Valid(Value),
    Invalid(MessageBag),
}

impl ValidationResult {
    pub fn passes(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn fails(&self) -> bool {
        !self.passes()
    }

    pub fn errors(&self) -> Option<&MessageBag> {
        match self {
            ValidationResult::Invalid(errors) => Some(errors),
            ValidationResult::Valid(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Value, ValidationFailure> {
        match self {
            ValidationResult::Valid(data) => Ok(data),
            ValidationResult::Invalid(errors) => Err(ValidationFailure::new(errors)),
        }
    }
}

/// A rule set plus messages and after hooks, reusable across records
#[derive(Clone, Default)]
pub struct Validator {
    rules: RuleSet,
    messages: Messages,
    after: Vec<Arc<AfterHook>>,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Register a cross-field check
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &mut MessageBag) + Send + Sync + 'static,
    {
        self.after.push(Arc::new(hook));
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate a record in a single pass
    pub fn validate(&self, data: &Value) -> ValidationResult {
        let mut errors = MessageBag::new();
        let mut validated = Value::object();

        for (path, rules) in self.rules.iter() {
            for resolved in path.resolve(data) {
                let value = data.get_path(&resolved);
                self.validate_field(data, path, &resolved, value, rules, &mut errors);

                if let Some(value) = value {
                    let segments: Vec<&str> = resolved.split('.').collect();
                    validated.insert_shaped(&segments, value.clone(), data);
                }
            }
        }

        for hook in &self.after {
            hook(data, &mut errors);
        }

        if errors.is_empty() {
            ValidationResult::Valid(validated)
        } else {
            tracing::debug!(fields = errors.len(), "validation failed");
            ValidationResult::Invalid(errors)
        }
    }

    fn validate_field(
        &self,
        data: &Value,
        path: &FieldPath,
        resolved: &str,
        value: Option<&Value>,
        rules: &[Rule],
        errors: &mut MessageBag,
    ) {
        let bail = rules.iter().any(|r| matches!(r, Rule::Bail));
        let numeric = rules.iter().any(|r| matches!(r, Rule::Numeric));
        let blank = value.map_or(true, Value::is_blank);
        let ctx = RuleContext::new(data, resolved).numeric(numeric);

        for rule in rules {
            if blank && !rule.is_implicit() {
                continue;
            }

            let Some(violation) = rule.evaluate(value, &ctx) else {
                continue;
            };

            tracing::debug!(field = resolved, rule = rule.name(), "rule failed");
            errors.add(resolved, self.messages.render(path.as_str(), resolved, &violation));

            // A failed implicit rule leaves nothing meaningful to check
            if bail || rule.is_implicit() {
                break;
            }
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("messages", &self.messages)
            .field("after", &self.after.len())
            .finish()
    }
}

/// Validate `data` against `rules` with default messages and no hooks
pub fn validate(data: &Value, rules: &RuleSet) -> ValidationResult {
    Validator::new(rules.clone()).validate(data)
}
