use maud::{html, Markup};

use crate::browse::Catalog;
use crate::domain::{BrowseParams, Status};

/// Search and dropdown filters. Submits back to the browse page; the
/// category chip is re-derived from the chosen status.
pub fn filter_bar(params: &BrowseParams, catalog: &Catalog) -> Markup {
    let status = params.status.as_deref().unwrap_or("all");
    let city = params.city.as_deref().unwrap_or("");
    let license = params.license_type.as_deref().unwrap_or("");

    html! {
        form method="get" action="/" class="filter-bar" role="search" {
            input
                type="search"
                name="q"
                value=(params.search.as_deref().unwrap_or(""))
                placeholder="Buscar por empresa, endereço ou cidade";

            select name="status" aria-label="Status" {
                option value="all" selected[status == "all"] { "Todos Status" }
                @for s in Status::canonical() {
                    option value=(s.as_str()) selected[status == s.as_str()] { (s.as_str()) }
                }
            }

            select name="city" aria-label="Cidade" {
                option value="" { "Todas as cidades" }
                @for c in &catalog.cities {
                    option value=(c) selected[city == c] { (c) }
                }
            }

            select name="license" aria-label="Tipo de licença" {
                option value="" { "Todos os tipos" }
                @for t in &catalog.license_types {
                    option value=(t) selected[license == t] { (t) }
                }
            }

            @for c in &params.cities {
                input type="hidden" name="cities" value=(c);
            }
            @if let Some(year) = &params.year {
                input type="hidden" name="year" value=(year);
            }
            input type="hidden" name="tab" value=(params.tab.as_str());

            button type="submit" class="btn" { "Buscar" }
            a href=(params.cleared().href()) class="btn btn-outline" { "Limpar Filtros" }
        }
    }
}
