// File: src/rules/mod.rs
// Purpose: Rule variants, rule sets and rule shorthand parsing

use crate::error::RuleParseError;
use crate::path::FieldPath;
use crate::value::{format_number, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod builtin;

/// What a size rule measured: characters, a number, or items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeKind {
    String,
    Numeric,
    Array,
}

impl SizeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SizeKind::String => "string",
            SizeKind::Numeric => "numeric",
            SizeKind::Array => "array",
        }
    }
}

/// A single rule failure, before it is rendered into a message
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Rendered from a template keyed by `rule` (and `rule.variant`)
    Rule {
        rule: &'static str,
        variant: Option<&'static str>,
        params: Vec<(&'static str, String)>,
    },
    /// Message supplied by a closure or rule object
    Message(String),
}

impl Violation {
    fn rule(rule: &'static str) -> Self {
        Violation::Rule {
            rule,
            variant: None,
            params: Vec::new(),
        }
    }
}

/// What a rule can see besides the value under test
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    data: &'a Value,
    attribute: &'a str,
    numeric: bool,
}

impl<'a> RuleContext<'a> {
    pub fn new(data: &'a Value, attribute: &'a str) -> Self {
        Self {
            data,
            attribute,
            numeric: false,
        }
    }

    pub(crate) fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    /// The whole record being validated
    pub fn data(&self) -> &'a Value {
        self.data
    }

    /// Resolved path of the field under test
    pub fn attribute(&self) -> &'a str {
        self.attribute
    }

    /// Look up another field of the record by resolved path
    pub fn field(&self, path: &str) -> Option<&'a Value> {
        self.data.get_path(path)
    }
}

/// A caller-defined rule object
///
/// Return `Err(message)` to fail; `:attribute` in the message is replaced by
/// the field's display name. Several rule objects may be attached to a field.
pub trait ValidationRule: Send + Sync {
    fn validate(
        &self,
        attribute: &str,
        value: &Value,
        ctx: &RuleContext<'_>,
    ) -> Result<(), String>;

    /// Implicit rules also run when the value is absent or blank
    fn implicit(&self) -> bool {
        false
    }
}

pub type RuleFn = dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync;

/// Password requirements, checked in order: length, letters, mixed case,
/// numbers, symbols
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordPolicy {
    min: usize,
    letters: bool,
    mixed_case: bool,
    numbers: bool,
    symbols: bool,
}

impl PasswordPolicy {
    pub fn min(min: usize) -> Self {
        Self {
            min,
            ..Self::default()
        }
    }

    pub fn letters(mut self) -> Self {
        self.letters = true;
        self
    }

    pub fn mixed_case(mut self) -> Self {
        self.mixed_case = true;
        self
    }

    pub fn numbers(mut self) -> Self {
        self.numbers = true;
        self
    }

    pub fn symbols(mut self) -> Self {
        self.symbols = true;
        self
    }

    fn check(&self, password: &str) -> Option<Violation> {
        let failed = |variant: &'static str, params: Vec<(&'static str, String)>| {
            Some(Violation::Rule {
                rule: "password",
                variant: Some(variant),
                params,
            })
        };

        if password.chars().count() < self.min {
            return failed("min", vec![("min", self.min.to_string())]);
        }
        if self.letters && !builtin::has_letter(password) {
            return failed("letters", vec![]);
        }
        if self.mixed_case && !builtin::has_mixed_case(password) {
            return failed("mixed", vec![]);
        }
        if self.numbers && !builtin::has_number(password) {
            return failed("numbers", vec![]);
        }
        if self.symbols && !builtin::has_symbol(password) {
            return failed("symbols", vec![]);
        }
        None
    }
}

/// One validation rule
#[derive(Clone)]
pub enum Rule {
    Required,
    Email,
    Min(f64),
    Max(f64),
    In(Vec<String>),
    Numeric,
    /// Stop checking a field after its first failure
    Bail,
    Password(PasswordPolicy),
    Closure(Arc<RuleFn>),
    Custom(Arc<dyn ValidationRule>),
}

impl Rule {
    /// Wrap a closure as a rule
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Closure(Arc::new(f))
    }

    /// Wrap a rule object
    pub fn custom<R: ValidationRule + 'static>(rule: R) -> Self {
        Rule::Custom(Arc::new(rule))
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::In(values.into_iter().map(Into::into).collect())
    }

    /// Parse `"required|email|max:100"` into rules
    pub fn parse_list(shorthand: &str) -> Result<Vec<Rule>, RuleParseError> {
        shorthand
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Rule::from_str)
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Email => "email",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::In(_) => "in",
            Rule::Numeric => "numeric",
            Rule::Bail => "bail",
            Rule::Password(_) => "password",
            Rule::Closure(_) => "closure",
            Rule::Custom(_) => "custom",
        }
    }

    /// Implicit rules run even when the value is absent or blank
    pub fn is_implicit(&self) -> bool {
        match self {
            Rule::Required => true,
            Rule::Custom(rule) => rule.implicit(),
            _ => false,
        }
    }

    /// Check `value`; `None` means the field is absent from the record
    pub fn evaluate(&self, value: Option<&Value>, ctx: &RuleContext<'_>) -> Option<Violation> {
        let present = value.unwrap_or(&Value::Null);

        match self {
            Rule::Required => {
                (!builtin::is_present(value)).then(|| Violation::rule("required"))
            }
            Rule::Email => {
                let valid = present.as_str().is_some_and(builtin::is_valid_email);
                (!valid).then(|| Violation::rule("email"))
            }
            Rule::Min(min) => {
                let (size, kind) = builtin::size_of(present, ctx.numeric);
                (size < *min).then(|| size_violation("min", kind, *min))
            }
            Rule::Max(max) => {
                let (size, kind) = builtin::size_of(present, ctx.numeric);
                (size > *max).then(|| size_violation("max", kind, *max))
            }
            Rule::In(allowed) => (!builtin::is_in(present, allowed)).then(|| Violation::Rule {
                rule: "in",
                variant: None,
                params: vec![("values", allowed.join(", "))],
            }),
            Rule::Numeric => (!builtin::is_numeric(present)).then(|| Violation::rule("numeric")),
            Rule::Bail => None,
            Rule::Password(policy) => policy.check(&present.to_string()),
            Rule::Closure(f) => f(ctx.attribute(), present).err().map(Violation::Message),
            Rule::Custom(rule) => rule
                .validate(ctx.attribute(), present, ctx)
                .err()
                .map(Violation::Message),
        }
    }
}

fn size_violation(rule: &'static str, kind: SizeKind, bound: f64) -> Violation {
    Violation::Rule {
        rule,
        variant: Some(kind.as_str()),
        params: vec![(rule, format_number(bound))],
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Min(n) => write!(f, "Min({})", n),
            Rule::Max(n) => write!(f, "Max({})", n),
            Rule::In(values) => f.debug_tuple("In").field(values).finish(),
            Rule::Password(policy) => f.debug_tuple("Password").field(policy).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (s.trim(), None),
        };

        let number = |rule: &str| -> Result<f64, RuleParseError> {
            let param = param
                .filter(|p| !p.is_empty())
                .ok_or_else(|| RuleParseError::MissingParameter(rule.to_string()))?;
            param
                .parse::<f64>()
                .map_err(|_| RuleParseError::InvalidParameter {
                    rule: rule.to_string(),
                    value: param.to_string(),
                })
        };

        match name {
            "required" => Ok(Rule::Required),
            "email" => Ok(Rule::Email),
            "numeric" => Ok(Rule::Numeric),
            "bail" => Ok(Rule::Bail),
            "min" => number("min").map(Rule::Min),
            "max" => number("max").map(Rule::Max),
            "in" => {
                let values = param
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| RuleParseError::MissingParameter("in".to_string()))?;
                Ok(Rule::one_of(values.split(',').map(str::trim)))
            }
            unknown => Err(RuleParseError::UnknownRule(unknown.to_string())),
        }
    }
}

/// Field paths mapped to their rules, in declaration order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: Vec<(FieldPath, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach rules to a field path; rules for an existing path are appended
    pub fn field(mut self, path: impl Into<FieldPath>, rules: Vec<Rule>) -> Self {
        let path = path.into();
        match self.fields.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => existing.extend(rules),
            None => self.fields.push((path, rules)),
        }
        self
    }

    /// Build from `(path, shorthand)` pairs such as `("username", "required|email")`
    pub fn parse<'a, I>(entries: I) -> Result<Self, RuleParseError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        entries
            .into_iter()
            .try_fold(RuleSet::new(), |set, (path, shorthand)| -> Result<_, RuleParseError> {
                Ok(set.field(path, Rule::parse_list(shorthand)?))
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[Rule])> {
        self.fields.iter().map(|(p, r)| (p, r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
