use maud::{html, Markup};

use crate::forms::FieldErrors;
use crate::templates::components::{card, centered, text_field};
use crate::templates::desktop_layout;

pub fn forgot_password_page(
    email: &str,
    errors: &FieldErrors,
    notice: Option<Markup>,
    sent: bool,
) -> Markup {
    let body = if sent {
        html! {
            @if let Some(n) = notice { (n) }
            p class="muted text-center" {
                "Se existir uma conta para " strong { (email) } ", você receberá um link para redefinir sua senha."
            }
            a href="/login" class="btn btn-outline w-full" { "Voltar para Login" }
        }
    } else {
        html! {
            @if let Some(n) = notice { (n) }
            form method="post" action="/forgot-password" class="stack" novalidate {
                (text_field("email", "Email", "email", email, "seu@email.com", errors))
                button type="submit" class="btn w-full" { "Enviar link de recuperação" }
            }
            div class="card-footer text-center text-sm" {
                a href="/login" { "Voltar para Login" }
            }
        }
    };

    desktop_layout(
        "Recuperar senha",
        None,
        centered(card(
            "Recuperar Senha",
            "Informe seu email para receber um link de recuperação",
            body,
        )),
    )
}
