// src/tests/router_tests/auth_tests.rs
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, issued_cookie, location, post_form, sign_in, test_app,
};

#[test]
fn login_page_loads_successfully() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/login", None), &t.app)?;

    assert_eq!(resp.status(), 200);
    assert!(issued_cookie(&resp).is_none(), "no session before sign-in");
    let body = body_string(resp);
    assert!(body.contains("Obra Alerta Maps"));
    assert!(body.contains(r#"action="/login""#));
    assert!(body.contains("/forgot-password"));
    Ok(())
}

#[test]
fn login_with_invalid_form_shows_field_errors() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(post_form("/login", "email=nope&password=123", None), &t.app)?;

    assert_eq!(resp.status(), 422);
    let body = body_string(resp);
    assert!(body.contains("Email inválido"));
    assert!(body.contains("A senha deve ter pelo menos 6 caracteres"));
    assert!(t.auth.calls().is_empty(), "no remote call for invalid input");
    Ok(())
}

#[test]
fn login_with_wrong_password_shows_notice() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(
        post_form("/login", "email=ana%40obra.com&password=errada123", None),
        &t.app,
    )?;

    assert_eq!(resp.status(), 400);
    let body = body_string(resp);
    assert!(body.contains("Email ou senha incorretos"));
    assert!(body.contains(r#"value="ana@obra.com""#));
    Ok(())
}

#[test]
fn login_redirects_to_filter_page() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let resp = handle(get("/filter", Some(&cookie)), &t.app)?;
    assert_eq!(resp.status(), 200);
    assert!(issued_cookie(&resp).is_none(), "known session keeps its cookie");
    assert!(body_string(resp).contains("ana@obra.com"));
    Ok(())
}

#[test]
fn protected_pages_redirect_to_login() -> Result<(), ServerError> {
    let t = test_app();

    for uri in ["/", "/filter", "/?city=Gaspar"] {
        let resp = handle(get(uri, None), &t.app)?;
        assert_eq!(resp.status(), 302, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }
    assert_eq!(t.source.calls(), 0, "no data is fetched before sign-in");
    Ok(())
}

#[test]
fn logout_clears_the_session() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);

    let resp = handle(post_form("/logout", "", Some(&cookie)), &t.app)?;
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
    assert_eq!(t.auth.calls().iter().filter(|c| **c == "sign_out").count(), 1);

    let resp = handle(get("/filter", Some(&cookie)), &t.app)?;
    assert_eq!(location(&resp), "/login");
    Ok(())
}

#[test]
fn logout_goes_to_login_even_when_remote_revoke_fails() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);
    *t.auth.fail_network.lock().unwrap() = true;

    let resp = handle(post_form("/logout", "", Some(&cookie)), &t.app)?;
    assert_eq!(location(&resp), "/login");

    let resp = handle(get("/", Some(&cookie)), &t.app)?;
    assert_eq!(location(&resp), "/login");
    Ok(())
}

#[test]
fn logout_without_session_still_lands_on_login() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(post_form("/logout", "", None), &t.app)?;

    assert_eq!(location(&resp), "/login");
    assert!(!t.auth.calls().contains(&"sign_out"));
    Ok(())
}

#[test]
fn register_validates_confirmation() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(
        post_form(
            "/register",
            "email=novo%40obra.com&password=segredo123&confirm_password=outra123",
            None,
        ),
        &t.app,
    )?;

    assert_eq!(resp.status(), 422);
    assert!(body_string(resp).contains("As senhas não coincidem"));
    Ok(())
}

#[test]
fn register_sends_confirmation_email() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(
        post_form(
            "/register",
            "email=novo%40obra.com&password=segredo123&confirm_password=segredo123",
            None,
        ),
        &t.app,
    )?;
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/register-confirmation");

    let resp = handle(get("/register-confirmation", None), &t.app)?;
    assert!(body_string(resp).contains("Verifique seu Email"));
    Ok(())
}

#[test]
fn register_existing_account_shows_notice() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(
        post_form(
            "/register",
            "email=ana%40obra.com&password=segredo123&confirm_password=segredo123",
            None,
        ),
        &t.app,
    )?;

    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Este email já está cadastrado."));
    Ok(())
}

#[test]
fn forgot_password_reports_sent_link() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(post_form("/forgot-password", "email=ana%40obra.com", None), &t.app)?;

    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Email enviado"));
    assert_eq!(t.auth.calls(), vec!["reset_password"]);
    Ok(())
}

#[test]
fn signup_callback_signs_in_and_schedules_redirect() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/auth/callback?token_hash=good-hash&type=signup", None), &t.app)?;
    assert_eq!(resp.status(), 200);
    let cookie = issued_cookie(&resp).unwrap();
    assert!(body_string(resp).contains("url=/filter"));

    let resp = handle(get("/filter", Some(&cookie)), &t.app)?;
    assert_eq!(resp.status(), 200);
    Ok(())
}

#[test]
fn callback_with_bad_link_shows_error() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/auth/callback?token_hash=stale&type=signup", None), &t.app)?;
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Token has expired or is invalid"));

    let resp = handle(get("/auth/callback", None), &t.app)?;
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Voltar para Login"));
    Ok(())
}

#[test]
fn callback_surfaces_reported_error() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(
        get("/auth/callback?error=access_denied&error_description=Email+link+is+invalid", None),
        &t.app,
    )?;

    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Email link is invalid"));
    assert!(t.auth.calls().is_empty());
    Ok(())
}

#[test]
fn recovery_link_leads_to_password_reset() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/auth/callback?token_hash=good-hash&type=recovery", None), &t.app)?;
    assert_eq!(location(&resp), "/reset-password");
    let cookie = issued_cookie(&resp).unwrap();

    let resp = handle(get("/reset-password", Some(&cookie)), &t.app)?;
    assert!(body_string(resp).contains(r#"action="/reset-password""#));

    let resp = handle(
        post_form("/reset-password", "password=nova12345&confirm_password=nova1234", Some(&cookie)),
        &t.app,
    )?;
    assert_eq!(resp.status(), 422);

    let resp = handle(
        post_form("/reset-password", "password=nova12345&confirm_password=nova12345", Some(&cookie)),
        &t.app,
    )?;
    assert_eq!(location(&resp), "/filter");
    assert!(t.auth.calls().contains(&"update_password"));
    Ok(())
}

#[test]
fn reset_password_needs_a_recovery_session() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/reset-password", None), &t.app)?;
    assert!(body_string(resp).contains("Solicitar novo link"));

    let resp = handle(
        post_form("/reset-password", "password=nova12345&confirm_password=nova12345", None),
        &t.app,
    )?;
    assert_eq!(resp.status(), 400);
    assert!(!t.auth.calls().contains(&"update_password"));
    Ok(())
}
