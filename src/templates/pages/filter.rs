use maud::{html, Markup};

use crate::templates::components::{notice, NoticeKind};
use crate::templates::desktop_layout;

pub struct FilterVm<'a> {
    pub user_email: &'a str,
    pub cities: &'a [String],
    pub years: Vec<String>,
    /// Set when the city list could not be loaded.
    pub error: Option<String>,
}

/// Landing page after sign-in: pick cities and an issue year, then browse.
pub fn filter_page(vm: &FilterVm) -> Markup {
    desktop_layout(
        "Filtrar",
        Some(vm.user_email),
        html! {
            div class="container" {
                header class="text-center" {
                    h1 { "Filtrar Licenças Ambientais" }
                    p class="muted" { "Selecione os critérios abaixo para encontrar as licenças desejadas." }
                }

                main class="card narrow" {
                    @if let Some(err) = &vm.error {
                        (notice(NoticeKind::Error, "Erro ao carregar opções de filtro", err))
                    }

                    form method="get" action="/" class="stack" {
                        div class="form-item" {
                            label for="cities" { "Cidades" }
                            select id="cities" name="cities" multiple size="8" {
                                @for c in vm.cities {
                                    option value=(c) { (c) }
                                }
                            }
                            p class="text-xs muted" { "Use Ctrl (ou Cmd) para selecionar mais de uma cidade." }
                        }

                        div class="form-item" {
                            label for="year" { "Ano de Emissão" }
                            select id="year" name="year" {
                                option value="" { "Selecione um ano" }
                                @for y in &vm.years {
                                    option value=(y) { (y) }
                                }
                            }
                        }

                        button type="submit" class="btn w-full" { "Ver Resultados" }
                    }
                    p class="text-center text-sm" { a href="/" { "Ver todas as licenças" } }
                }
            }
        },
    )
}
