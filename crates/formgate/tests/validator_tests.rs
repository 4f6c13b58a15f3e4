//! Integration tests for formgate
//!
//! Cover the login rule set, multi-rule fields, custom messages, closures,
//! rule objects, after hooks and nested / wildcard paths.

use formgate::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn data(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn login_rules() -> RuleSet {
    RuleSet::parse([("username", "required"), ("password", "required")]).unwrap()
}

fn account_rules() -> RuleSet {
    RuleSet::new()
        .field("username", Rule::parse_list("required|email|max:100").unwrap())
        .field(
            "password",
            vec![Rule::Required, Rule::Min(6.0), Rule::Max(20.0)],
        )
}

/// Rejects values that are not fully upper case
struct Uppercase;

impl ValidationRule for Uppercase {
    fn validate(&self, _attribute: &str, value: &Value, _ctx: &RuleContext<'_>) -> Result<(), String> {
        let value = value.to_string();
        if value.to_uppercase() != value {
            return Err("The :attribute must be UPPERCASE".to_string());
        }
        Ok(())
    }
}

/// Password may not repeat the username
struct RegistrationRule;

impl ValidationRule for RegistrationRule {
    fn validate(&self, attribute: &str, value: &Value, ctx: &RuleContext<'_>) -> Result<(), String> {
        if ctx.field("username") == Some(value) {
            return Err(format!("{} must be different with username", attribute));
        }
        Ok(())
    }
}

/// Nickname is needed unless the visitor is a guest, and `root` is taken
struct Nickname;

impl ValidationRule for Nickname {
    fn validate(&self, _attribute: &str, value: &Value, ctx: &RuleContext<'_>) -> Result<(), String> {
        if value.is_blank() && ctx.field("guest") != Some(&Value::Bool(true)) {
            return Err("The :attribute is needed unless guest".to_string());
        }
        if value.as_str() == Some("root") {
            return Err("The :attribute is reserved".to_string());
        }
        Ok(())
    }

    fn implicit(&self) -> bool {
        true
    }
}

#[test]
fn test_login_rules_accept_filled_fields() {
    let input = data(json!({ "username": "admin", "password": "123" }));
    let result = validate(&input, &login_rules());

    assert!(result.passes());
    assert!(!result.fails());
}

#[test]
fn test_login_rules_reject_empty_fields() {
    let input = data(json!({ "username": "", "password": "" }));
    let result = validate(&input, &login_rules());

    assert!(result.fails());
    let errors = result.errors().unwrap();
    assert_eq!(errors.get("username"), ["The username field is required."]);
    assert_eq!(errors.get("password"), ["The password field is required."]);
}

#[test]
fn test_non_empty_strings_always_pass_required() {
    for (username, password) in [("a", "b"), ("admin", "123"), ("x y", "  p  "), ("ü", "🔑")] {
        let input = data(json!({ "username": username, "password": password }));
        assert!(
            validate(&input, &login_rules()).passes(),
            "{username:?} / {password:?} should pass"
        );
    }
}

#[test]
fn test_missing_or_empty_field_is_always_reported() {
    let cases = [
        (json!({ "password": "123" }), "username"),
        (json!({ "username": "admin" }), "password"),
        (json!({ "username": "   ", "password": "123" }), "username"),
        (json!({ "username": "admin", "password": null }), "password"),
        (json!({ "username": [], "password": "123" }), "username"),
    ];

    for (input, field) in cases {
        let result = validate(&data(input.clone()), &login_rules());
        let errors = result.errors().unwrap_or_else(|| panic!("{input} should fail"));
        assert!(errors.has(field), "{input} should report {field}");
    }
}

#[test]
fn test_failure_converts_into_error() {
    let input = data(json!({ "username": "", "password": "" }));
    let failure = validate(&input, &login_rules()).into_result().unwrap_err();

    assert_eq!(failure.errors().len(), 2);
    assert_eq!(
        failure.to_string(),
        "the given data was invalid (2 field(s) with errors)"
    );
    assert_eq!(
        failure.errors().to_json_pretty().unwrap(),
        "{\n  \"username\": [\n    \"The username field is required.\"\n  ],\n  \"password\": [\n    \"The password field is required.\"\n  ]\n}"
    );
}

#[test]
fn test_multiple_rules_per_field() {
    let input = data(json!({ "username": "dicky", "password": "dicky" }));
    let result = validate(&input, &account_rules());

    let errors = result.errors().unwrap();
    assert_eq!(
        errors.get("username"),
        ["The username field must be a valid email address."]
    );
    assert_eq!(
        errors.get("password"),
        ["The password field must be at least 6 characters."]
    );
}

#[test]
fn test_valid_data_keeps_only_validated_keys() {
    let input = data(json!({
        "username": "admin@pzn.com",
        "password": "rahasia",
        "admin": true,
        "others": "xxx"
    }));

    let valid = validate(&input, &account_rules()).into_result().unwrap();
    assert_eq!(
        valid,
        data(json!({ "username": "admin@pzn.com", "password": "rahasia" }))
    );
}

#[test]
fn test_inline_messages() {
    let messages = Messages::new()
        .message("required", ":attribute harus diisi")
        .message("email", ":attribute harus berupa email")
        .message("max", ":attribute maksimal :max karakter")
        .message("min", ":attribute minimal :min karakter");

    let input = data(json!({ "username": "dicky", "password": "dicky" }));
    let result = Validator::new(account_rules())
        .with_messages(messages)
        .validate(&input);

    let errors = result.errors().unwrap();
    assert_eq!(errors.get("username"), ["username harus berupa email"]);
    assert_eq!(errors.get("password"), ["password minimal 6 karakter"]);
}

#[test]
fn test_after_hook_adds_cross_field_error() {
    let validator = Validator::new(account_rules()).after(|data, errors| {
        if data.get_path("username") == data.get_path("password") {
            errors.add("password", "password tidak boleh sama dengan username");
        }
    });

    let input = data(json!({ "username": "a@b.com", "password": "a@b.com" }));
    let result = validator.validate(&input);

    let errors = result.errors().unwrap();
    assert!(!errors.has("username"));
    assert_eq!(
        errors.get("password"),
        ["password tidak boleh sama dengan username"]
    );
}

#[test]
fn test_custom_rule_objects() {
    let rules = RuleSet::new()
        .field(
            "username",
            vec![Rule::Required, Rule::Email, Rule::Max(100.0), Rule::custom(Uppercase)],
        )
        .field(
            "password",
            vec![
                Rule::Required,
                Rule::Min(6.0),
                Rule::Max(20.0),
                Rule::custom(RegistrationRule),
            ],
        );

    let input = data(json!({ "username": "dicky@pzn.com", "password": "dicky@pzn.com" }));
    let result = validate(&input, &rules);

    let errors = result.errors().unwrap();
    assert_eq!(errors.get("username"), ["The username must be UPPERCASE"]);
    assert_eq!(
        errors.get("password"),
        ["password must be different with username"]
    );
}

#[test]
fn test_multiple_rule_objects_on_one_field() {
    let rules = RuleSet::new().field(
        "password",
        vec![Rule::custom(Uppercase), Rule::custom(RegistrationRule)],
    );

    let input = data(json!({ "username": "secret", "password": "secret" }));
    let result = validate(&input, &rules);

    assert_eq!(result.errors().unwrap().get("password").len(), 2);
}

#[test]
fn test_implicit_rule_object_runs_on_absent_and_blank_values() {
    let rules = RuleSet::new().field(
        "nickname",
        vec![Rule::custom(Nickname), Rule::custom(Uppercase)],
    );

    for input in [json!({}), json!({ "nickname": "   " }), json!({ "nickname": null })] {
        let result = validate(&data(input.clone()), &rules);
        let errors = result.errors().unwrap_or_else(|| panic!("{input} should fail"));
        assert_eq!(
            errors.get("nickname"),
            ["The nickname is needed unless guest"],
            "{input}"
        );
    }

    assert!(validate(&data(json!({ "guest": true })), &rules).passes());
}

#[test]
fn test_implicit_rule_object_failure_stops_field() {
    let rules = RuleSet::new().field(
        "nickname",
        vec![Rule::custom(Nickname), Rule::custom(Uppercase)],
    );

    let result = validate(&data(json!({ "nickname": "root" })), &rules);
    assert_eq!(
        result.errors().unwrap().get("nickname"),
        ["The nickname is reserved"]
    );

    let result = validate(&data(json!({ "nickname": "dicky" })), &rules);
    assert_eq!(
        result.errors().unwrap().get("nickname"),
        ["The nickname must be UPPERCASE"]
    );
}

#[test]
fn test_non_implicit_rule_object_skips_blank_values() {
    let rules = RuleSet::new().field("password", vec![Rule::custom(RegistrationRule)]);

    let input = data(json!({ "username": "", "password": "" }));
    assert!(validate(&input, &rules).passes());

    let input = data(json!({ "username": "secret", "password": "secret" }));
    assert!(validate(&input, &rules).fails());
}

#[test]
fn test_closure_rule() {
    let rules = RuleSet::new().field(
        "username",
        vec![
            Rule::Required,
            Rule::Email,
            Rule::Max(100.0),
            Rule::closure(|attribute, value| {
                let value = value.to_string();
                if value.to_uppercase() != value {
                    return Err(format!("The field {} must be UPPERCASE", attribute));
                }
                Ok(())
            }),
        ],
    );

    let input = data(json!({ "username": "dicky@pzn.com" }));
    let result = validate(&input, &rules);
    assert_eq!(
        result.errors().unwrap().get("username"),
        ["The field username must be UPPERCASE"]
    );

    let input = data(json!({ "username": "DICKY@PZN.COM" }));
    assert!(validate(&input, &rules).passes());
}

#[test]
fn test_in_and_password_rules() {
    let rules = RuleSet::new()
        .field(
            "username",
            vec![Rule::Required, Rule::one_of(["Eko", "Dicky", "Meli"])],
        )
        .field(
            "password",
            vec![
                Rule::Required,
                Rule::Password(PasswordPolicy::min(6).letters().numbers().symbols()),
            ],
        );

    let input = data(json!({ "username": "Dicky", "password": "dicky@pzn123.com" }));
    assert!(validate(&input, &rules).passes());

    let input = data(json!({ "username": "Budi", "password": "dickypzn" }));
    let result = validate(&input, &rules);
    let errors = result.errors().unwrap();
    assert_eq!(errors.get("username"), ["The selected username is invalid."]);
    assert_eq!(
        errors.get("password"),
        ["The password field must contain at least one number."]
    );
}

#[test]
fn test_nested_paths() {
    let rules = RuleSet::parse([
        ("name.first", "required|max:100"),
        ("name.last", "max:100"),
        ("address.street", "max:100"),
        ("address.city", "required|max:100"),
        ("address.country", "required|max:100"),
    ])
    .unwrap();

    let input = data(json!({
        "name": { "first": "Dicky", "last": "Satria" },
        "address": {
            "street": "Jl. Cikole Babakan",
            "city": "Garut",
            "country": "Indonesia"
        }
    }));
    assert!(validate(&input, &rules).passes());

    let input = data(json!({ "name": { "last": "Satria" } }));
    let result = validate(&input, &rules);
    let fields: Vec<&str> = result.errors().unwrap().fields().collect();
    assert_eq!(fields, vec!["name.first", "address.city", "address.country"]);
}

#[test]
fn test_wildcard_paths() {
    let rules = RuleSet::parse([
        ("name.first", "required|max:100"),
        ("name.last", "max:100"),
        ("address.*.street", "max:100"),
        ("address.*.city", "required|max:100"),
        ("address.*.country", "required|max:100"),
    ])
    .unwrap();

    let input = data(json!({
        "name": { "first": "Dicky", "last": "Satria" },
        "address": [
            { "street": "Jl. Cikole Babakan", "city": "Garut", "country": "Indonesia" },
            { "street": "Jl. Inhoftank", "city": "Bandung", "country": "Indonesia" }
        ]
    }));
    assert!(validate(&input, &rules).passes());

    let input = data(json!({
        "name": { "first": "Dicky" },
        "address": [
            { "city": "Garut", "country": "Indonesia" },
            { "street": "Jl. Inhoftank", "country": "Indonesia" }
        ]
    }));
    let result = validate(&input, &rules);
    let errors = result.errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get("address.1.city"),
        ["The address.1.city field is required."]
    );
}

#[test]
fn test_wildcard_validated_data_keeps_list_shape() {
    let rules = RuleSet::parse([("address.*.city", "required")]).unwrap();
    let input = data(json!({
        "address": [
            { "city": "Garut", "zip": "44151" },
            { "city": "Bandung" }
        ]
    }));

    let valid = validate(&input, &rules).into_result().unwrap();
    assert_eq!(
        valid,
        data(json!({ "address": [{ "city": "Garut" }, { "city": "Bandung" }] }))
    );
}

#[test]
fn test_wildcard_validated_data_without_field_in_earlier_element() {
    let rules = RuleSet::parse([("address.*.street", "max:50")]).unwrap();
    let input = data(json!({
        "address": [
            { "city": "Garut" },
            { "city": "Bandung", "street": "Jl. Asia Afrika" }
        ]
    }));

    let valid = validate(&input, &rules).into_result().unwrap();
    assert_eq!(
        valid,
        data(json!({ "address": [{}, { "street": "Jl. Asia Afrika" }] }))
    );
}

#[test]
fn test_validation_is_idempotent() {
    let validator = Validator::new(account_rules()).after(|data, errors| {
        if data.get_path("username") == data.get_path("password") {
            errors.add("password", "same as username");
        }
    });

    for input in [
        json!({ "username": "dicky", "password": "dicky" }),
        json!({ "username": "admin@pzn.com", "password": "rahasia" }),
        json!({}),
    ] {
        let input = data(input);
        assert_eq!(validator.validate(&input), validator.validate(&input));
    }
}

#[test]
fn test_numeric_fields_compare_magnitude() {
    let rules = RuleSet::parse([("age", "numeric|min:18|max:60"), ("code", "max:3")]).unwrap();

    let input = data(json!({ "age": "17", "code": "1234" }));
    let result = validate(&input, &rules);
    let errors = result.errors().unwrap();
    assert_eq!(errors.get("age"), ["The age field must be at least 18."]);
    assert_eq!(
        errors.get("code"),
        ["The code field must not be greater than 3 characters."]
    );

    let input = data(json!({ "age": 30, "code": "abc" }));
    assert!(validate(&input, &rules).passes());
}
