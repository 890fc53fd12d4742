use maud::{html, Markup};

use crate::domain::{BrowseParams, Construction};

pub fn construction_card(record: &Construction, params: &BrowseParams) -> Markup {
    html! {
        article class="card construction-card" {
            div class="card-header" {
                h3 { (record.display_name()) }
                span class=(record.status.badge_class()) { (record.status.as_str()) }
            }
            div class="card-body" {
                @if !record.address.is_empty() {
                    p { (record.address) }
                }
                p class="muted" {
                    (record.city)
                    @if !record.license_type.is_empty() {
                        " · " (record.license_type)
                    }
                }
                @if let Some(date) = record.formatted_date() {
                    p class="text-xs muted" { "Emitida em " (date) }
                }
                @if !record.has_coordinates() {
                    p class="text-xs muted" { "Sem localização no mapa" }
                }
            }
            div class="card-footer" {
                a class="btn btn-outline btn-sm" href=(params.with_selected(Some(&record.id)).href()) {
                    "Detalhes"
                }
            }
        }
    }
}
