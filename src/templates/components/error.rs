use maud::{html, Markup};

use crate::templates::desktop_layout;

/// Body of every error response.
pub fn error_page(status: u16, message: &str) -> Markup {
    desktop_layout(
        &format!("Erro {status}"),
        None,
        html! {
            main class="container narrow" {
                h1 { "Erro " (status) }
                p { (message) }
                p { a href="/" { "← Voltar para o início" } }
            }
        },
    )
}
