// src/router.rs
use std::cell::RefCell;
use std::rc::Rc;

use astra::Request;
use chrono::Datelike;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::app::App;
use crate::auth::store::LOGIN_PATH;
use crate::auth::sessions::clear_cookie_header;
use crate::auth::{AuthError, AuthUser, SessionEntry, SessionHandle, SignUpOutcome, VerifyKind};
use crate::browse::BrowsePage;
use crate::domain::params::year_options;
use crate::domain::{BrowseParams, Construction};
use crate::errors::ServerError;
use crate::forms::{
    FieldErrors, ForgotPasswordForm, FormData, LoginForm, RegisterForm, ResetPasswordForm,
};
use crate::map::{adapter_for, default_view, MapController, RetryPolicy};
use crate::responses::{html_response, html_response_with_status, redirect, with_cookie, ResultResp};
use crate::templates::components::{notice, NoticeKind};
use crate::templates::pages::{
    auth_callback_page, filter_page, forgot_password_page, index_page, login_page, not_found_page,
    register_confirmation_page, register_page, reset_password_page, FilterVm, IndexVm,
};

pub const HOME_PATH: &str = "/filter";

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let now = chrono::Utc::now().timestamp();
    let cookie = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    // anonymous requests leave nothing behind in the registry
    let session = app.sessions.lookup(cookie.as_deref(), now)?;
    let session = session.as_ref();

    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    match (method.as_str(), path.as_str()) {
        ("GET", "/login") => html_response(login_page("", &FieldErrors::default(), None)),
        ("POST", "/login") => login(&mut req, app, session, now),
        ("GET", "/register") => html_response(register_page("", &FieldErrors::default(), None)),
        ("POST", "/register") => register(&mut req, app, session, now),
        ("GET", "/register-confirmation") => html_response(register_confirmation_page()),
        ("GET", "/forgot-password") => {
            html_response(forgot_password_page("", &FieldErrors::default(), None, false))
        }
        ("POST", "/forgot-password") => forgot_password(&mut req, app, now),
        ("GET", "/reset-password") => {
            let can_reset = current_user(app, session, now)?.is_some();
            html_response(reset_password_page(&FieldErrors::default(), None, can_reset))
        }
        ("POST", "/reset-password") => reset_password(&mut req, app, session, now),
        ("GET", "/auth/callback") => auth_callback(query.as_deref(), app, session, now),
        ("POST", "/logout") => logout(app, session),
        ("GET", "/filter") => match current_user(app, session, now)? {
            Some(user) => filter(app, &user),
            None => to_login(session),
        },
        ("GET", "/") => match current_user(app, session, now)? {
            Some(user) => index(query.as_deref(), app, &user),
            None => to_login(session),
        },
        ("GET", _) => html_response_with_status(404, not_found_page(&path)),
        _ => Err(ServerError::NotFound),
    }
}

/// Re-check the session with the provider, then report who is signed in.
/// A session that no longer holds a user is dropped from the registry.
fn current_user(
    app: &App,
    session: Option<&SessionHandle>,
    now: i64,
) -> Result<Option<AuthUser>, ServerError> {
    let Some(session) = session else {
        return Ok(None);
    };
    let user = {
        let mut store = session.entry.store()?;
        store.revalidate(app.auth.as_ref(), now);
        store.user().cloned()
    };
    if user.is_none() && app.sessions.revoke(&session.token) {
        debug!("session no longer valid, revoked");
    }
    Ok(user)
}

fn to_login(session: Option<&SessionHandle>) -> ResultResp {
    let resp = redirect(LOGIN_PATH)?;
    with_cookie(resp, session.map(|_| clear_cookie_header()))
}

/// Register a freshly authenticated store under a new token. Whatever the
/// browser held before is revoked, so a token is never carried across sign-in.
fn start_session(
    app: &App,
    previous: Option<&SessionHandle>,
    entry: SessionEntry,
    now: i64,
    resp: ResultResp,
) -> ResultResp {
    let resp = resp?;
    if let Some(previous) = previous {
        app.sessions.revoke(&previous.token);
    }
    let handle = app.sessions.establish(entry, now)?;
    with_cookie(resp, Some(handle.cookie()))
}

fn failure_status(err: &AuthError) -> u16 {
    match err {
        AuthError::Network(_) => 502,
        AuthError::RateLimited => 429,
        _ => 400,
    }
}

fn login(req: &mut Request, app: &App, session: Option<&SessionHandle>, now: i64) -> ResultResp {
    let form = FormData::read(req)?;
    let login = match LoginForm::validate(&form) {
        Ok(login) => login,
        Err(errors) => return html_response_with_status(422, login_page(form.text("email"), &errors, None)),
    };

    let entry = SessionEntry::new(now);
    let result = entry
        .store()?
        .authenticate(app.auth.as_ref(), &login.email, &login.password);
    match result {
        Ok(()) => start_session(app, session, entry, now, redirect(HOME_PATH)),
        Err(e) => {
            warn!(error = %e, "sign in failed");
            let msg = notice(NoticeKind::Error, "Erro ao entrar", &e.user_message());
            html_response_with_status(
                failure_status(&e),
                login_page(&login.email, &FieldErrors::default(), Some(msg)),
            )
        }
    }
}

fn register(req: &mut Request, app: &App, session: Option<&SessionHandle>, now: i64) -> ResultResp {
    let form = FormData::read(req)?;
    let reg = match RegisterForm::validate(&form) {
        Ok(reg) => reg,
        Err(errors) => {
            return html_response_with_status(422, register_page(form.text("email"), &errors, None))
        }
    };

    let callback = app.public_url("/auth/callback");
    let entry = SessionEntry::new(now);
    let result = entry
        .store()?
        .register(app.auth.as_ref(), &reg.email, &reg.password, &callback);
    match result {
        Ok(SignUpOutcome::ConfirmationSent) => redirect("/register-confirmation"),
        Ok(SignUpOutcome::SignedIn(_)) => start_session(app, session, entry, now, redirect(HOME_PATH)),
        Err(e) => {
            warn!(error = %e, "sign up failed");
            let msg = notice(NoticeKind::Error, "Erro ao criar conta", &e.user_message());
            html_response_with_status(
                failure_status(&e),
                register_page(&reg.email, &FieldErrors::default(), Some(msg)),
            )
        }
    }
}

fn forgot_password(req: &mut Request, app: &App, now: i64) -> ResultResp {
    let form = FormData::read(req)?;
    let fp = match ForgotPasswordForm::validate(&form) {
        Ok(fp) => fp,
        Err(errors) => {
            return html_response_with_status(
                422,
                forgot_password_page(form.text("email"), &errors, None, false),
            )
        }
    };

    let back_to = app.public_url("/reset-password");
    let result = SessionEntry::new(now)
        .store()?
        .request_password_reset(app.auth.as_ref(), &fp.email, &back_to);
    match result {
        Ok(()) => {
            let msg = notice(
                NoticeKind::Success,
                "Email enviado",
                "Verifique sua caixa de entrada para redefinir sua senha.",
            );
            html_response(forgot_password_page(&fp.email, &FieldErrors::default(), Some(msg), true))
        }
        Err(e) => {
            warn!(error = %e, "password reset request failed");
            let msg = notice(NoticeKind::Error, "Erro ao enviar email", &e.user_message());
            html_response_with_status(
                failure_status(&e),
                forgot_password_page(&fp.email, &FieldErrors::default(), Some(msg), false),
            )
        }
    }
}

fn reset_password(
    req: &mut Request,
    app: &App,
    session: Option<&SessionHandle>,
    now: i64,
) -> ResultResp {
    let form = FormData::read(req)?;
    let can_reset = current_user(app, session, now)?.is_some();
    let reset = match ResetPasswordForm::validate(&form) {
        Ok(reset) => reset,
        Err(errors) => {
            return html_response_with_status(422, reset_password_page(&errors, None, can_reset))
        }
    };

    let result = match session {
        Some(session) => session
            .entry
            .store()?
            .update_password(app.auth.as_ref(), &reset.password),
        None => Err(AuthError::NotSignedIn),
    };
    match result {
        Ok(()) => redirect(HOME_PATH),
        Err(e) => {
            warn!(error = %e, "password update failed");
            let msg = notice(NoticeKind::Error, "Erro ao redefinir senha", &e.user_message());
            html_response_with_status(
                failure_status(&e),
                reset_password_page(&FieldErrors::default(), Some(msg), can_reset),
            )
        }
    }
}

/// Landing point for emailed links: `?token_hash=..&type=signup|recovery`.
fn auth_callback(
    query: Option<&str>,
    app: &App,
    session: Option<&SessionHandle>,
    now: i64,
) -> ResultResp {
    let mut token_hash = None;
    let mut kind = None;
    let mut reported = None;
    for (k, v) in form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
        match k.as_ref() {
            "token_hash" => token_hash = Some(v.into_owned()),
            "type" => kind = VerifyKind::parse(&v),
            "error_description" => reported = Some(v.into_owned()),
            _ => {}
        }
    }

    if let Some(description) = reported {
        warn!(error = %description, "auth callback reported an error");
        return html_response_with_status(400, auth_callback_page(Err(description)));
    }

    let (Some(token_hash), Some(kind)) = (token_hash, kind) else {
        return match current_user(app, session, now)? {
            Some(_) => html_response(auth_callback_page(Ok(()))),
            None => html_response_with_status(
                400,
                auth_callback_page(Err("Link de confirmação inválido ou expirado.".into())),
            ),
        };
    };

    let entry = SessionEntry::new(now);
    let result = entry
        .store()?
        .complete_verification(app.auth.as_ref(), &token_hash, kind);
    match (result, kind) {
        (Ok(()), VerifyKind::Recovery) => {
            start_session(app, session, entry, now, redirect("/reset-password"))
        }
        (Ok(()), _) => start_session(
            app,
            session,
            entry,
            now,
            html_response(auth_callback_page(Ok(()))),
        ),
        (Err(e), _) => {
            warn!(error = %e, kind = kind.as_str(), "verification failed");
            html_response_with_status(failure_status(&e), auth_callback_page(Err(e.user_message())))
        }
    }
}

fn logout(app: &App, session: Option<&SessionHandle>) -> ResultResp {
    let Some(session) = session else {
        return redirect(LOGIN_PATH);
    };
    // the store logs remote failures and clears local state regardless
    let _ = session.entry.store()?.sign_out(app.auth.as_ref());
    app.sessions.revoke(&session.token);
    let target = session
        .entry
        .redirect
        .take()
        .unwrap_or_else(|| LOGIN_PATH.to_string());
    with_cookie(redirect(&target)?, Some(clear_cookie_header()))
}

fn filter(app: &App, user: &AuthUser) -> ResultResp {
    let (cities, error) = match app.repo.fetch_cities() {
        Ok(cities) => (cities, None),
        Err(e) => {
            warn!(error = %e, "could not load filter options");
            (Vec::new(), Some(e.user_message().to_string()))
        }
    };

    html_response(filter_page(&FilterVm {
        user_email: &user.email,
        cities: &cities,
        years: year_options(chrono::Local::now().year()),
        error,
    }))
}

fn index(query: Option<&str>, app: &App, user: &AuthUser) -> ResultResp {
    let params = BrowseParams::parse(query);
    let BrowsePage { catalog, state } = BrowsePage::load(&app.repo, &params.to_filter());

    let records = state.records();
    let picked: Rc<RefCell<Option<Construction>>> = Rc::new(RefCell::new(None));

    let mut map = MapController::new(
        adapter_for(&app.config.map),
        RetryPolicy::from_config(&app.config.map),
    );
    let sink = picked.clone();
    map.on_marker_click(move |record| *sink.borrow_mut() = Some(record.clone()));

    let map_available = match map
        .show(default_view(&app.config.map))
        .and_then(|_| map.sync_markers(records))
    {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, provider = map.provider().as_str(), "map unavailable");
            false
        }
    };

    if let Some(id) = params.selected.as_deref() {
        // records without coordinates have no marker but can still be opened
        if !map.click(id) {
            *picked.borrow_mut() = records.iter().find(|r| r.id == id).cloned();
        }
    }
    let selected = picked.borrow_mut().take();

    let page = index_page(&IndexVm {
        user_email: &user.email,
        params: &params,
        catalog: &catalog,
        state: &state,
        map: map.render(),
        map_available,
        selected: selected.as_ref(),
    });
    drop(map);

    html_response(page)
}
