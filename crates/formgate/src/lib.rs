// formgate - field validation for submitted form data
// Rules per field path, wildcard expansion, message bags and after hooks

pub mod error;
pub mod messages;
pub mod path;
pub mod rules;
pub mod validator;
pub mod value;

pub use error::{RuleParseError, ValidationFailure};
pub use messages::{MessageBag, Messages};
pub use path::FieldPath;
pub use rules::{PasswordPolicy, Rule, RuleContext, RuleSet, ValidationRule, Violation};
pub use validator::{validate, AfterHook, ValidationResult, Validator};
pub use value::Value;
