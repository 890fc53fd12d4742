use maud::{html, Markup};

use crate::templates::desktop_layout;

pub fn not_found_page(path: &str) -> Markup {
    desktop_layout(
        "Página não encontrada",
        None,
        html! {
            main class="container narrow text-center" {
                h1 { "404" }
                p { "Oops! Página não encontrada" }
                p class="muted text-xs" { code { (path) } }
                a href="/" { "Voltar para o início" }
            }
        },
    )
}
