use maud::{html, Markup};

use crate::forms::FieldErrors;
use crate::templates::components::{card, centered, password_field};
use crate::templates::desktop_layout;

/// `can_reset` is false when the browser holds no recovery session.
pub fn reset_password_page(errors: &FieldErrors, notice: Option<Markup>, can_reset: bool) -> Markup {
    let body = if can_reset {
        html! {
            @if let Some(n) = notice { (n) }
            form method="post" action="/reset-password" class="stack" novalidate {
                (password_field("password", "Nova senha", errors))
                (password_field("confirm_password", "Confirmar nova senha", errors))
                button type="submit" class="btn w-full" { "Redefinir senha" }
            }
        }
    } else {
        html! {
            @if let Some(n) = notice { (n) }
            p class="muted text-center" {
                "O link de recuperação é inválido ou expirou. Solicite um novo link."
            }
            a href="/forgot-password" class="btn btn-outline w-full" { "Solicitar novo link" }
        }
    };

    desktop_layout(
        "Redefinir senha",
        None,
        centered(card("Redefinir Senha", "Escolha uma nova senha para sua conta", body)),
    )
}
