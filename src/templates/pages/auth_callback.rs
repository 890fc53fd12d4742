use maud::{html, Markup};

use crate::templates::components::{card, centered};
use crate::templates::desktop_layout;

/// Seconds before a confirmed user is sent on to the filter page.
pub const REDIRECT_DELAY_SECS: u32 = 2;

pub fn auth_callback_page(outcome: Result<(), String>) -> Markup {
    let body = match &outcome {
        Ok(()) => html! {
            meta http-equiv="refresh" content=(format!("{REDIRECT_DELAY_SECS};url=/filter"));
            p class="text-center" { "Email confirmado com sucesso! Redirecionando..." }
            a href="/filter" class="btn w-full" { "Continuar" }
        },
        Err(message) => html! {
            div class="alert alert-error" role="alert" {
                strong { "Erro na autenticação" }
                p { (message) }
            }
            a href="/login" class="btn btn-outline w-full" { "Voltar para Login" }
        },
    };

    desktop_layout(
        "Confirmação",
        None,
        centered(card("Confirmação de Email", "", body)),
    )
}
