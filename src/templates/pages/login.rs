use maud::{html, Markup};

use crate::forms::FieldErrors;
use crate::templates::components::{card, centered, password_field, text_field};
use crate::templates::desktop_layout;

pub fn login_page(email: &str, errors: &FieldErrors, notice: Option<Markup>) -> Markup {
    desktop_layout(
        "Entrar",
        None,
        centered(card(
            "Entrar",
            "Informe suas credenciais para acessar o mapa",
            html! {
                @if let Some(n) = notice { (n) }
                form method="post" action="/login" class="stack" novalidate {
                    (text_field("email", "Email", "email", email, "seu@email.com", errors))
                    (password_field("password", "Senha", errors))
                    button type="submit" class="btn w-full" { "Entrar" }
                }
                div class="card-footer text-center text-sm" {
                    a href="/forgot-password" { "Esqueceu sua senha?" }
                    p { "Não tem uma conta? " a href="/register" { "Cadastre-se" } }
                }
            },
        )),
    )
}
