use maud::{html, Markup};

use crate::browse::{Catalog, LoadState};
use crate::domain::{BrowseParams, Construction, Tab};
use crate::templates::components::{
    category_chips, construction_card, details_dialog, filter_bar, notice, NoticeKind,
};
use crate::templates::desktop_layout;

pub struct IndexVm<'a> {
    pub user_email: &'a str,
    pub params: &'a BrowseParams,
    pub catalog: &'a Catalog,
    pub state: &'a LoadState,
    /// Map markup, or the error banner when the map is unusable.
    pub map: Markup,
    pub map_available: bool,
    pub selected: Option<&'a Construction>,
}

pub fn index_page(vm: &IndexVm) -> Markup {
    let body = match vm.state {
        LoadState::Failed(message) => load_failed(vm.params, message),
        LoadState::Loaded(records) => browse(vm, records),
    };

    desktop_layout(
        "Mapa",
        Some(vm.user_email),
        html! {
            main class="container wide" {
                h1 { "Obra Alerta Maps" }
                (body)
            }
        },
    )
}

fn load_failed(params: &BrowseParams, message: &str) -> Markup {
    html! {
        div class="centered" {
            (notice(NoticeKind::Error, "Erro ao carregar dados", message))
            a href=(params.with_selected(None).href()) class="btn btn-outline" { "Tentar Novamente" }
        }
    }
}

fn browse(vm: &IndexVm, records: &[Construction]) -> Markup {
    let params = vm.params;
    let map_tab = params.with_tab(Tab::Map).with_selected(None).href();
    let list_tab = params.with_tab(Tab::List).with_selected(None).href();
    let show_map = params.tab == Tab::Map && vm.map_available;

    html! {
        (filter_bar(params, vm.catalog))
        (category_chips(params))

        @if records.is_empty() {
            div class="empty-state" {
                h3 { "Nenhuma construção encontrada" }
                p class="muted" { "Tente ajustar os filtros de busca" }
                a href=(params.cleared().href()) class="btn btn-outline" { "Limpar Filtros" }
            }
        }

        nav class="tabs" {
            @if vm.map_available {
                a.tab.tab-active[params.tab == Tab::Map] href=(map_tab) data-tab="map" { "Mapa" }
            } @else {
                span class="tab disabled" data-tab="map" aria-disabled="true" { "Mapa" }
            }
            a.tab.tab-active[!show_map] href=(list_tab) data-tab="list" { "Lista" }
        }

        @if params.tab == Tab::Map {
            // the banner replaces the map when it cannot load
            section class="tab-content map-tab" { (vm.map) }
        }
        @if show_map {
            p class="text-sm muted" { (records.len()) " obras encontradas" }
        } @else {
            section class="tab-content list-tab" {
                div class="grid" {
                    @for record in records {
                        (construction_card(record, params))
                    }
                }
            }
        }

        @if let Some(record) = vm.selected {
            (details_dialog(record, params))
        }
    }
}
