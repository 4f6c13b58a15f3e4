// File: src/views.rs
// Purpose: Maud templates for the login form

use formgate::{MessageBag, Value};
use maud::{html, Markup, DOCTYPE};

/// Page shell shared by every view
fn page(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

/// Label with the field's first error shown inline
fn field(label: &str, name: &str, kind: &str, value: Option<String>, errors: &MessageBag) -> Markup {
    html! {
        label for=(name) {
            (label) " : "
            @if let Some(message) = errors.first(name) {
                span class="error" { (message) }
                " "
            }
            input type=(kind) name=(name) id=(name) value=[value];
        }
        br;
    }
}

/// Login form, re-rendered with errors and the submitted username
pub fn login_form(errors: &MessageBag, old: &Value) -> Markup {
    let username = old.get_path("username").map(|v| v.to_string());

    page(
        "Login Form",
        html! {
            @if !errors.is_empty() {
                ul class="errors" {
                    @for message in errors.all() {
                        li { (message) }
                    }
                }
            }

            form action="/form" method="POST" {
                (field("Username", "username", "text", username, errors))
                (field("Password", "password", "password", None, errors))
                input type="submit" value="Login";
            }
        },
    )
}

pub fn login_succeeded(username: &str) -> Markup {
    page(
        "Login Form",
        html! {
            p { "Welcome, " (username) "." }
            a href="/form" { "Back" }
        },
    )
}
