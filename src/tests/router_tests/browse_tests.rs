// src/tests/router_tests/browse_tests.rs
use crate::backend::BackendError;
use crate::domain::construction::COL_CITY;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::fixtures::{failing_source, fixture_rows, FixtureSource};
use crate::tests::utils::{body_string, get, sign_in, test_app, test_app_with};
use astra::{Body, Request};
use http::Method;
use serde_json::json;

#[test]
fn filter_page_offers_cities_and_years() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/filter", Some(&cookie)), &t.app)?);

    assert!(body.contains("Filtrar Licenças Ambientais"));
    assert!(body.contains("Ano de Emissão"));
    assert!(body.contains(r#"<option value="Blumenau">"#));
    assert!(body.contains(r#"<option value="Gaspar">"#));
    assert!(body.contains(r#"<option value="2010">"#));
    Ok(())
}

#[test]
fn map_tab_places_markers_for_located_records() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/", Some(&cookie)), &t.app)?);

    assert!(body.contains(r#"data-provider="leaflet""#));
    assert!(body.contains("Construtora Silva Ltda"));
    assert!(!body.contains("Engenharia Beta"), "no marker without coordinates");
    assert!(body.contains("5 obras encontradas"));
    assert_eq!(t.source.calls(), 3, "records, cities and license types");
    Ok(())
}

#[test]
fn list_tab_shows_every_record() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/?tab=list", Some(&cookie)), &t.app)?);

    for name in ["Construtora Silva Ltda", "Obras Souza", "Engenharia Beta", "Delta Incorporações"] {
        assert!(body.contains(name), "{name}");
    }
    assert!(body.contains("Sem localização no mapa"));
    Ok(())
}

#[test]
fn city_filter_queries_the_backend() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/?city=Gaspar&tab=list", Some(&cookie)), &t.app)?);

    assert!(body.contains("Silva &amp; Filhos"));
    assert!(!body.contains("Obras Souza"));
    assert_eq!(t.source.calls(), 4);
    Ok(())
}

#[test]
fn reload_sees_rows_added_since_the_last_visit() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);
    handle(get("/?tab=list", Some(&cookie)), &t.app)?;

    t.source.push_row(json!({
        "id": "6",
        "Nome da Empresa": "Nova Construtora",
        "Cidade": "Gaspar",
        "status": "Análise"
    }));
    let body = body_string(handle(get("/?tab=list", Some(&cookie)), &t.app)?);

    assert!(body.contains("Nova Construtora"));
    assert!(body.contains("6 obras encontradas"));
    assert_eq!(t.source.calls(), 6, "each visit loads afresh");
    Ok(())
}

#[test]
fn city_options_failure_keeps_the_list_usable() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);
    t.source.fail_when(
        |q| q.columns().iter().any(|c| c == COL_CITY),
        BackendError::Status {
            status: 500,
            message: "boom".into(),
        },
    );

    let body = body_string(handle(get("/?tab=list", Some(&cookie)), &t.app)?);

    assert!(!body.contains("Erro ao carregar dados"));
    assert!(body.contains("Obras Souza"));
    assert!(!body.contains(r#"<option value="Gaspar">"#));
    Ok(())
}

#[test]
fn category_chip_filters_by_status() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/?category=Consulta&tab=list", Some(&cookie)), &t.app)?);

    assert!(body.contains("Silva &amp; Filhos"));
    assert!(!body.contains("Construtora Silva Ltda"));
    Ok(())
}

#[test]
fn empty_result_offers_to_clear_filters() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/?q=inexistente&tab=list", Some(&cookie)), &t.app)?);

    assert!(body.contains("Nenhuma construção encontrada"));
    assert!(body.contains("Limpar Filtros"));
    Ok(())
}

#[test]
fn failed_initial_load_shows_retry_and_recovers() -> Result<(), ServerError> {
    let t = test_app_with(failing_source(), &[]);
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/", Some(&cookie)), &t.app)?);
    assert!(body.contains("Erro ao carregar dados"));
    assert!(body.contains("Tentar Novamente"));

    t.source.set_failure(None);
    let body = body_string(handle(get("/?tab=list", Some(&cookie)), &t.app)?);
    assert!(body.contains("Obras Souza"));
    Ok(())
}

#[test]
fn failed_filter_query_shows_error_view() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);
    t.source.fail_when(
        |q| !q.clauses().is_empty(),
        BackendError::Status {
            status: 500,
            message: "boom".into(),
        },
    );

    let body = body_string(handle(get("/?city=Gaspar", Some(&cookie)), &t.app)?);
    assert!(body.contains("Erro ao carregar dados"));
    assert!(!body.contains("boom"));

    let body = body_string(handle(get("/?tab=list", Some(&cookie)), &t.app)?);
    assert!(body.contains("Obras Souza"), "unfiltered view is unaffected");
    Ok(())
}

#[test]
fn selected_marker_opens_details() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/?selected=1", Some(&cookie)), &t.app)?);

    assert!(body.contains("details-dialog"));
    assert!(body.contains("Ver no Google Maps"));
    assert!(body.contains("10/03/2022"));
    Ok(())
}

#[test]
fn selected_record_without_location_still_opens_details() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/?tab=list&selected=4", Some(&cookie)), &t.app)?);

    assert!(body.contains("details-dialog"));
    assert!(body.contains("Engenharia Beta"));

    let body = body_string(handle(get("/?tab=list&selected=999", Some(&cookie)), &t.app)?);
    assert!(!body.contains("details-dialog"));
    Ok(())
}

#[test]
fn unconfigured_mapbox_falls_back_to_list() -> Result<(), ServerError> {
    let t = test_app_with(FixtureSource::new(fixture_rows()), &[("MAP_PROVIDER", "mapbox")]);
    let cookie = sign_in(&t);

    let body = body_string(handle(get("/", Some(&cookie)), &t.app)?);

    assert!(body.contains("O mapa não está configurado"));
    assert!(body.contains(r#"aria-disabled="true""#));
    assert!(body.contains("Obras Souza"), "list stays usable");
    assert!(!body.contains("mapbox-gl.js"));
    Ok(())
}

#[test]
fn unknown_page_renders_not_found() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/nao-existe", None), &t.app)?;

    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("/nao-existe"));
    Ok(())
}

#[test]
fn unsupported_method_is_not_found() {
    let t = test_app();
    let req: Request = http::Request::builder()
        .method(Method::DELETE)
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let err = handle(req, &t.app).unwrap_err();

    assert_eq!(err.status(), 404);
}
