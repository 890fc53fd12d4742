// src/auth/gotrue.rs
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::auth::provider::{AuthError, AuthProvider, AuthUser, Session, SignUpOutcome, VerifyKind};
use crate::backend::client::read_json;
use crate::backend::{BackendError, SupabaseClient};

/// `AuthProvider` over the hosted GoTrue endpoints (`/auth/v1/*`).
pub struct GoTrueClient {
    client: Arc<SupabaseClient>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .or_else(|| self.expires_in.map(|s| chrono::Utc::now().timestamp() + s));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

impl GoTrueClient {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    fn with_redirect(&self, path: &str, redirect_to: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(redirect_to.as_bytes()).collect();
        format!("{}?redirect_to={}", self.client.auth_url(path), encoded)
    }

    fn send(&self, req: reqwest::blocking::RequestBuilder) -> Result<Value, AuthError> {
        let resp = req
            .header("Content-Type", "application/json")
            .send()
            .map_err(|e| AuthError::Network(e.to_string()))?;
        read_json(resp).map_err(classify)
    }

    fn session_from(&self, body: Value) -> Result<Session, AuthError> {
        serde_json::from_value::<TokenResponse>(body)
            .map(TokenResponse::into_session)
            .map_err(|e| AuthError::Rejected {
                status: 200,
                message: format!("unexpected token response: {e}"),
            })
    }
}

impl AuthProvider for GoTrueClient {
    fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> Result<SignUpOutcome, AuthError> {
        let url = self.with_redirect("signup", redirect_to);
        let body = self.send(
            self.client
                .post(&url, None)
                .json(&json!({ "email": email, "password": password })),
        )?;

        // Autoconfirm projects answer with a full session.
        if body.get("access_token").is_some() {
            info!("sign up returned a session directly");
            return self.session_from(body).map(SignUpOutcome::SignedIn);
        }
        Ok(SignUpOutcome::ConfirmationSent)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = self.client.auth_url("token?grant_type=password");
        let body = self.send(
            self.client
                .post(&url, None)
                .json(&json!({ "email": email, "password": password })),
        )?;
        self.session_from(body)
    }

    fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = self.client.auth_url("logout");
        match self.send(self.client.post(&url, Some(access_token))) {
            Ok(_) => Ok(()),
            // the token is already dead; nothing left to revoke
            Err(AuthError::SessionExpired) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        let url = self.with_redirect("recover", redirect_to);
        self.send(self.client.post(&url, None).json(&json!({ "email": email })))?;
        Ok(())
    }

    fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let url = self.client.auth_url("user");
        let body = self.send(self.client.get(&url, Some(access_token)))?;
        serde_json::from_value(body).map_err(|e| AuthError::Rejected {
            status: 200,
            message: format!("unexpected user response: {e}"),
        })
    }

    fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        debug!("refreshing access token");
        let url = self.client.auth_url("token?grant_type=refresh_token");
        let body = self.send(
            self.client
                .post(&url, None)
                .json(&json!({ "refresh_token": refresh_token })),
        )?;
        self.session_from(body)
    }

    fn update_password(&self, access_token: &str, password: &str) -> Result<(), AuthError> {
        let url = self.client.auth_url("user");
        self.send(
            self.client
                .put(&url, Some(access_token))
                .json(&json!({ "password": password })),
        )?;
        Ok(())
    }

    fn verify(&self, token_hash: &str, kind: VerifyKind) -> Result<Session, AuthError> {
        let url = self.client.auth_url("verify");
        let body = self.send(
            self.client
                .post(&url, None)
                .json(&json!({ "type": kind.as_str(), "token_hash": token_hash })),
        )?;
        self.session_from(body)
    }
}

/// Map a transport-level failure to the auth taxonomy. GoTrue does not use
/// stable error codes across versions, so the message text decides.
pub fn classify(err: BackendError) -> AuthError {
    match err {
        BackendError::Network(msg) => AuthError::Network(msg),
        BackendError::Decode(msg) => AuthError::Rejected {
            status: 200,
            message: msg,
        },
        BackendError::Status { status, message } => {
            let lower = message.to_lowercase();
            if status == 429 {
                AuthError::RateLimited
            } else if lower.contains("invalid login credentials") || lower.contains("invalid grant") {
                AuthError::InvalidCredentials
            } else if lower.contains("email not confirmed") {
                AuthError::EmailNotConfirmed
            } else if lower.contains("already registered") || lower.contains("already been registered") {
                AuthError::UserAlreadyRegistered
            } else if lower.contains("password should") || lower.contains("weak password") {
                AuthError::WeakPassword(message)
            } else if status == 401 || lower.contains("jwt expired") || lower.contains("invalid jwt") {
                AuthError::SessionExpired
            } else {
                warn!(status, %message, "unclassified auth service error");
                AuthError::Rejected { status, message }
            }
        }
    }
}
