use maud::{html, Markup};

use crate::domain::params::CATEGORIES;
use crate::domain::BrowseParams;

pub fn category_chips(params: &BrowseParams) -> Markup {
    let active = params.active_category();
    html! {
        nav class="category-scroller" aria-label="Categorias" {
            @for cat in CATEGORIES {
                @let selected = active == cat.id;
                a.chip.chip-active[selected]
                    href=(params.with_category(cat.id).href())
                    aria-current=[selected.then_some("true")]
                {
                    (cat.label)
                }
            }
        }
    }
}
