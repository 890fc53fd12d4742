use maud::{html, Markup};

use crate::templates::components::{card, centered};
use crate::templates::desktop_layout;

pub fn register_confirmation_page() -> Markup {
    desktop_layout(
        "Verifique seu email",
        None,
        centered(card(
            "Verifique seu Email",
            "Enviamos um link de confirmação para o seu email",
            html! {
                p class="muted text-center" {
                    "Por favor, verifique sua caixa de entrada e clique no link de confirmação para ativar sua conta. "
                    "Se não encontrar o email, verifique também sua pasta de spam."
                }
                a href="/login" class="btn btn-outline w-full" { "Voltar para Login" }
            },
        )),
    )
}
