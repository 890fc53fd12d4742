// src/tests/utils.rs
use std::io::Read;
use std::sync::Arc;

use astra::{Body, Request, Response};
use http::Method;

use crate::app::App;
use crate::config::AppConfig;
use crate::router::handle;
use crate::tests::fixtures::{fixture_rows, FakeAuth, FixtureSource, TEST_PASSWORD};

pub const USER_EMAIL: &str = "ana@obra.com";

/// An app wired to in-memory fakes, with handles to inspect them.
pub struct TestApp {
    pub app: App,
    pub source: Arc<FixtureSource>,
    pub auth: Arc<FakeAuth>,
}

pub fn test_config(extra: &[(&str, &str)]) -> AppConfig {
    let extra: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(move |key| {
        if let Some((_, v)) = extra.iter().find(|(k, _)| k == key) {
            return Some(v.clone());
        }
        match key {
            "SUPABASE_URL" => Some("https://project.supabase.co".into()),
            "SUPABASE_ANON_KEY" => Some("anon-key".into()),
            "PUBLIC_BASE_URL" => Some("https://maps.example.com".into()),
            _ => None,
        }
    })
    .expect("test config must be valid")
}

pub fn test_app() -> TestApp {
    test_app_with(FixtureSource::new(fixture_rows()), &[])
}

pub fn test_app_with(source: FixtureSource, config: &[(&str, &str)]) -> TestApp {
    let source = Arc::new(source);
    let auth = Arc::new(FakeAuth::new(USER_EMAIL));
    let app = App::new(test_config(config), source.clone(), auth.clone());
    TestApp { app, source, auth }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(Method::GET).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        builder = builder.header("Cookie", c);
    }
    builder.body(Body::from(form.as_bytes().to_vec())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// `sid=...` pair from the response's Set-Cookie header, if one was issued.
pub fn issued_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Sign the fake account in and return the session cookie to send back.
pub fn sign_in(t: &TestApp) -> String {
    let form = format!("email={}&password={}", USER_EMAIL.replace('@', "%40"), TEST_PASSWORD);
    let resp = handle(post_form("/login", &form, None), &t.app).expect("login must succeed");
    assert_eq!(resp.status(), 302);
    issued_cookie(&resp).expect("a fresh session issues a cookie")
}
