// File: src/path.rs
// Purpose: Dotted field paths with `*` wildcards and their expansion against data

use crate::value::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Key(String),
    Wildcard,
}

/// A dotted field path such as `username`, `name.first` or `address.*.city`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw
            .split('.')
            .map(|s| match s {
                "*" => Segment::Wildcard,
                key => Segment::Key(key.to_string()),
            })
            .collect();

        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }

    /// Expand the path into concrete dotted paths present in `data`.
    ///
    /// Without wildcards the path resolves to itself even when the value is
    /// missing, so that `required` can report it. A wildcard over a missing or
    /// scalar value resolves to nothing.
    pub fn resolve(&self, data: &Value) -> Vec<String> {
        if !self.has_wildcard() {
            return vec![self.raw.clone()];
        }

        let mut resolved = Vec::new();
        let mut prefix = Vec::with_capacity(self.segments.len());
        expand(&self.segments, Some(data), &mut prefix, &mut resolved);
        resolved
    }
}

fn expand(
    segments: &[Segment],
    current: Option<&Value>,
    prefix: &mut Vec<String>,
    out: &mut Vec<String>,
) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(prefix.join("."));
        return;
    };

    match head {
        Segment::Key(key) => {
            prefix.push(key.clone());
            expand(rest, current.and_then(|v| v.child(key)), prefix, out);
            prefix.pop();
        }
        Segment::Wildcard => match current {
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    prefix.push(index.to_string());
                    expand(rest, Some(item), prefix, out);
                    prefix.pop();
                }
            }
            Some(Value::Object(map)) => {
                for (key, item) in map {
                    prefix.push(key.clone());
                    expand(rest, Some(item), prefix, out);
                    prefix.pop();
                }
            }
            _ => {}
        },
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(raw: &str) -> Self {
        FieldPath::new(raw)
    }
}

impl From<String> for FieldPath {
    fn from(raw: String) -> Self {
        FieldPath::new(raw)
    }
}
