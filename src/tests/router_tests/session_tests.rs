// src/tests/router_tests/session_tests.rs
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::fixtures::TEST_PASSWORD;
use crate::tests::utils::{get, issued_cookie, location, post_form, sign_in, test_app, USER_EMAIL};

fn login_form() -> String {
    format!("email={}&password={}", USER_EMAIL.replace('@', "%40"), TEST_PASSWORD)
}

#[test]
fn anonymous_requests_leave_no_session_behind() -> Result<(), ServerError> {
    let t = test_app();

    for _ in 0..100 {
        let resp = handle(get("/login", None), &t.app)?;
        assert!(issued_cookie(&resp).is_none());
    }
    handle(get("/", None), &t.app)?;
    handle(post_form("/login", "email=ana%40obra.com&password=errada123", None), &t.app)?;

    assert!(t.app.sessions.is_empty());
    Ok(())
}

#[test]
fn forged_cookie_gets_no_session() -> Result<(), ServerError> {
    let t = test_app();

    let resp = handle(get("/filter", Some("sid=not-a-real-token")), &t.app)?;

    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
    assert!(issued_cookie(&resp).is_none());
    assert!(t.app.sessions.is_empty());
    Ok(())
}

#[test]
fn signing_in_rotates_the_session_token() -> Result<(), ServerError> {
    let t = test_app();
    let before = sign_in(&t);

    let resp = handle(post_form("/login", &login_form(), Some(&before)), &t.app)?;
    let after = issued_cookie(&resp).unwrap();

    assert_ne!(before, after);
    assert_eq!(t.app.sessions.len(), 1);
    assert_eq!(location(&handle(get("/filter", Some(&before)), &t.app)?), "/login");
    assert_eq!(handle(get("/filter", Some(&after)), &t.app)?.status(), 200);
    Ok(())
}

#[test]
fn logout_expires_the_cookie_and_forgets_the_session() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);
    assert_eq!(t.app.sessions.len(), 1);

    let resp = handle(post_form("/logout", "", Some(&cookie)), &t.app)?;

    let header = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(header.starts_with("sid=;"));
    assert!(header.contains("Max-Age=0"));
    assert!(t.app.sessions.is_empty());
    Ok(())
}

#[test]
fn revoked_provider_session_is_noticed_on_next_request() -> Result<(), ServerError> {
    let t = test_app();
    let cookie = sign_in(&t);
    assert_eq!(handle(get("/", Some(&cookie)), &t.app)?.status(), 200);

    t.auth.revoke_all();
    let resp = handle(get("/", Some(&cookie)), &t.app)?;

    assert_eq!(location(&resp), "/login");
    assert!(resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("Max-Age=0")));
    assert!(t.app.sessions.is_empty());
    Ok(())
}

#[test]
fn browsers_do_not_share_sessions() -> Result<(), ServerError> {
    let t = test_app();
    let first = sign_in(&t);
    let second = sign_in(&t);
    assert_ne!(first, second);

    handle(post_form("/logout", "", Some(&first)), &t.app)?;

    assert_eq!(location(&handle(get("/filter", Some(&first)), &t.app)?), "/login");
    assert_eq!(handle(get("/filter", Some(&second)), &t.app)?.status(), 200);
    Ok(())
}
