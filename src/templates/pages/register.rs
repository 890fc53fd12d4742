use maud::{html, Markup};

use crate::forms::FieldErrors;
use crate::templates::components::{card, centered, password_field, text_field};
use crate::templates::desktop_layout;

pub fn register_page(email: &str, errors: &FieldErrors, notice: Option<Markup>) -> Markup {
    desktop_layout(
        "Criar conta",
        None,
        centered(card(
            "Criar conta",
            "Cadastre-se para acompanhar as licenças na sua região",
            html! {
                @if let Some(n) = notice { (n) }
                form method="post" action="/register" class="stack" novalidate {
                    (text_field("email", "Email", "email", email, "seu@email.com", errors))
                    (password_field("password", "Senha", errors))
                    (password_field("confirm_password", "Confirmar senha", errors))
                    button type="submit" class="btn w-full" { "Cadastrar" }
                }
                div class="card-footer text-center text-sm" {
                    p { "Já tem uma conta? " a href="/login" { "Entrar" } }
                }
            },
        )),
    )
}
