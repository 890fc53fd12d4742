// src/forms.rs
use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use astra::Request;
use url::form_urlencoded;

use crate::errors::ServerError;

pub const MIN_PASSWORD_LEN: usize = 6;
const MAX_FORM_BYTES: u64 = 16 * 1024;

/// Decoded `application/x-www-form-urlencoded` body.
#[derive(Debug, Default, Clone)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn parse(body: &str) -> Self {
        Self(
            form_urlencoded::parse(body.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// Bodies over the size cap are rejected, never cut short.
    pub fn read(req: &mut Request) -> Result<Self, ServerError> {
        let mut body = String::new();
        req.body_mut()
            .reader()
            .take(MAX_FORM_BYTES + 1)
            .read_to_string(&mut body)
            .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;
        if body.len() as u64 > MAX_FORM_BYTES {
            return Err(ServerError::BadRequest(format!(
                "form body exceeds {MAX_FORM_BYTES} bytes"
            )));
        }
        Ok(Self::parse(&body))
    }

    /// Trimmed value, `""` when absent.
    pub fn text(&self, key: &str) -> &str {
        self.0.get(key).map(|v| v.trim()).unwrap_or("")
    }

    /// Untrimmed value; passwords keep their spaces.
    pub fn raw(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }
}

/// Per-field validation messages, rendered next to their inputs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Trim and lowercase, then a minimal shape check.
pub fn normalize_email(email: &str) -> Option<String> {
    let e = email.trim().to_lowercase();
    let (local, domain) = e.split_once('@')?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || e.contains(char::is_whitespace) {
        return None;
    }
    Some(e)
}

fn check_email(form: &FormData, errors: &mut FieldErrors) -> String {
    let raw = form.text("email");
    if raw.is_empty() {
        errors.add("email", "Informe seu email");
        return String::new();
    }
    match normalize_email(raw) {
        Some(email) => email,
        None => {
            errors.add("email", "Email inválido");
            raw.to_string()
        }
    }
}

fn check_password(form: &FormData, field: &'static str, errors: &mut FieldErrors) -> String {
    let password = form.raw(field);
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(field, "A senha deve ter pelo menos 6 caracteres");
    }
    password.to_string()
}

fn check_confirmation(form: &FormData, password: &str, errors: &mut FieldErrors) {
    if form.raw("confirm_password") != password {
        errors.add("confirm_password", "As senhas não coincidem");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(form, &mut errors);
        let password = check_password(form, "password", &mut errors);
        errors.into_result(Self { email, password })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(form, &mut errors);
        let password = check_password(form, "password", &mut errors);
        check_confirmation(form, &password, &mut errors);
        errors.into_result(Self { email, password })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = check_email(form, &mut errors);
        errors.into_result(Self { email })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetPasswordForm {
    pub password: String,
}

impl ResetPasswordForm {
    pub fn validate(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let password = check_password(form, "password", &mut errors);
        check_confirmation(form, &password, &mut errors);
        errors.into_result(Self { password })
    }
}
