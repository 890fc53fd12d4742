use maud::{html, Markup};

use crate::forms::FieldErrors;

pub fn text_field(
    name: &str,
    label: &str,
    kind: &str,
    value: &str,
    placeholder: &str,
    errors: &FieldErrors,
) -> Markup {
    let error = errors.get(name);
    html! {
        div class="form-item" {
            label for=(name) { (label) }
            input
                type=(kind)
                id=(name)
                name=(name)
                value=(value)
                placeholder=(placeholder)
                aria-invalid=[error.map(|_| "true")]
                required;
            @if let Some(msg) = error {
                p class="form-message" { (msg) }
            }
        }
    }
}

/// Password inputs never echo the submitted value back.
pub fn password_field(name: &str, label: &str, errors: &FieldErrors) -> Markup {
    text_field(name, label, "password", "", "••••••••", errors)
}
