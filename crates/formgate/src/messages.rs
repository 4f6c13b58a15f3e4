// File: src/messages.rs
// Purpose: Error message bag, default message templates and custom overrides

use crate::rules::Violation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field paths mapped to their error messages, in the order fields failed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBag {
    messages: IndexMap<String, Vec<String>>,
}

impl MessageBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Check if a field has any message
    pub fn has(&self, field: &str) -> bool {
        self.messages.get(field).is_some_and(|m| !m.is_empty())
    }

    /// Get first message for a specific field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages.get(field)?.first().map(String::as_str)
    }

    /// Get all messages for a specific field
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every message of every field, in order
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.messages.values().flatten().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of fields with messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("required", "The :attribute field is required."),
    ("email", "The :attribute field must be a valid email address."),
    ("numeric", "The :attribute field must be a number."),
    ("in", "The selected :attribute is invalid."),
    ("min.string", "The :attribute field must be at least :min characters."),
    ("min.numeric", "The :attribute field must be at least :min."),
    ("min.array", "The :attribute field must have at least :min items."),
    ("max.string", "The :attribute field must not be greater than :max characters."),
    ("max.numeric", "The :attribute field must not be greater than :max."),
    ("max.array", "The :attribute field must not have more than :max items."),
    ("password.min", "The :attribute field must be at least :min characters."),
    ("password.letters", "The :attribute field must contain at least one letter."),
    (
        "password.mixed",
        "The :attribute field must contain at least one uppercase and one lowercase letter.",
    ),
    ("password.numbers", "The :attribute field must contain at least one number."),
    ("password.symbols", "The :attribute field must contain at least one symbol."),
];

const FALLBACK_MESSAGE: &str = "The :attribute field is invalid.";

fn default_template(key: &str) -> Option<&'static str> {
    DEFAULT_MESSAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, template)| *template)
}

/// Custom message templates and attribute display names
///
/// Message keys are either a rule name (`"required"`) or a field path followed
/// by a rule name (`"username.required"`, `"address.*.city.max"`).
#[derive(Debug, Clone, Default)]
pub struct Messages {
    custom: HashMap<String, String>,
    attributes: HashMap<String, String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the message for a rule key
    pub fn message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.custom.insert(key.into(), template.into());
        self
    }

    /// Display `path` as `name` in `:attribute`
    pub fn attribute(mut self, path: impl Into<String>, name: impl Into<String>) -> Self {
        self.attributes.insert(path.into(), name.into());
        self
    }

    /// Render a violation for a field
    ///
    /// `pattern` is the path as declared in the rule set, `resolved` the
    /// concrete path after wildcard expansion.
    pub fn render(&self, pattern: &str, resolved: &str, violation: &Violation) -> String {
        let (template, params): (String, &[(&'static str, String)]) = match violation {
            Violation::Rule {
                rule,
                variant,
                params,
            } => (
                self.template_for(pattern, resolved, rule, *variant),
                params.as_slice(),
            ),
            Violation::Message(message) => (message.clone(), &[][..]),
        };

        let mut rendered = template.replace(":attribute", &self.display_name(pattern, resolved));
        for (name, value) in params {
            rendered = rendered.replace(&format!(":{}", name), value);
        }
        rendered
    }

    fn template_for(
        &self,
        pattern: &str,
        resolved: &str,
        rule: &str,
        variant: Option<&str>,
    ) -> String {
        let custom = [
            format!("{}.{}", pattern, rule),
            format!("{}.{}", resolved, rule),
            rule.to_string(),
        ]
        .into_iter()
        .find_map(|key| self.custom.get(&key).cloned());

        if let Some(template) = custom {
            return template;
        }

        let key = match variant {
            Some(variant) => format!("{}.{}", rule, variant),
            None => rule.to_string(),
        };

        default_template(&key)
            .or_else(|| default_template(rule))
            .unwrap_or(FALLBACK_MESSAGE)
            .to_string()
    }

    fn display_name(&self, pattern: &str, resolved: &str) -> String {
        self.attributes
            .get(resolved)
            .or_else(|| self.attributes.get(pattern))
            .cloned()
            .unwrap_or_else(|| resolved.replace('_', " "))
    }
}
