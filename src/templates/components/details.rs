use maud::{html, Markup};

use crate::domain::{BrowseParams, Construction};

fn area(value: f64) -> String {
    if value > 0.0 {
        format!("{value:.2} m²").replace('.', ",")
    } else {
        "Não informada".to_string()
    }
}

fn or_missing(value: &str) -> &str {
    if value.trim().is_empty() {
        "Não informado"
    } else {
        value
    }
}

/// Details dialog for the record named by the `selected` parameter.
pub fn details_dialog(record: &Construction, params: &BrowseParams) -> Markup {
    let close = params.with_selected(None).href();
    let date = record
        .formatted_date()
        .unwrap_or_else(|| "Data não informada".to_string());

    html! {
        dialog open class="details-dialog" aria-labelledby="details-title" {
            header {
                h2 id="details-title" { (record.display_name()) }
                span class=(record.status.badge_class()) { (record.status.as_str()) }
                a href=(close) class="close" aria-label="Fechar" { "×" }
            }
            p class="muted" {
                "Licença de Operação para " (or_missing(&record.company_name))
                ". Status atual: " (record.status.as_str()) "."
            }

            section {
                h4 { "Informações da Empresa" }
                dl {
                    dt { "Empresa" } dd { (or_missing(&record.company_name)) }
                    dt { "CNPJ" } dd { (or_missing(&record.tax_id)) }
                }
            }

            section {
                h4 { "Detalhes da Licença" }
                dl {
                    dt { "Tipo" } dd { (or_missing(&record.license_type)) }
                    dt { "Data" } dd { (date) }
                    dt { "Arquivo" } dd { (or_missing(&record.file_name)) }
                    dt { "Área construída" } dd { (area(record.built_area)) }
                    dt { "Área do terreno" } dd { (area(record.lot_area)) }
                }
            }

            section {
                h4 { "Localização" }
                p { (or_missing(&record.address)) @if !record.city.is_empty() { ", " (record.city) } }
                @if record.has_coordinates() {
                    p class="text-xs muted" { (record.latitude) ", " (record.longitude) }
                }
                a href=(record.maps_link()) target="_blank" rel="noopener noreferrer" {
                    "Ver no Google Maps"
                }
            }

            footer {
                a href=(close) class="btn btn-outline" { "Fechar" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Status;

    #[test]
    fn shows_formatted_date_and_maps_link() {
        let record = Construction {
            id: "9".into(),
            company_name: "Construtora Silva".into(),
            issue_date: "2022-03-10".into(),
            status: Status::Aprovada,
            latitude: -26.9,
            longitude: -49.0,
            ..Default::default()
        };
        let params = BrowseParams::parse(Some("selected=9&tab=list"));

        let html = details_dialog(&record, &params).into_string();

        assert!(html.contains("10/03/2022"));
        assert!(html.contains("query=-26.9,-49"));
        // closing keeps the other parameters
        assert!(html.contains(r#"href="/?tab=list""#));
    }

    #[test]
    fn missing_date_is_spelled_out() {
        let html = details_dialog(&Construction::default(), &BrowseParams::default()).into_string();
        assert!(html.contains("Data não informada"));
    }
}
