// src/auth/provider.rs
use serde::Deserialize;

/// Signed-in identity as the auth service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix seconds, when the service sent one.
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// Account created; the user must follow the emailed link first.
    ConfirmationSent,
    /// Projects without email confirmation sign the user in directly.
    SignedIn(Session),
}

/// `type` of an emailed one-time link arriving at the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyKind {
    Signup,
    Recovery,
    Invite,
    MagicLink,
    EmailChange,
}

impl VerifyKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "signup" | "email" => Some(VerifyKind::Signup),
            "recovery" => Some(VerifyKind::Recovery),
            "invite" => Some(VerifyKind::Invite),
            "magiclink" => Some(VerifyKind::MagicLink),
            "email_change" => Some(VerifyKind::EmailChange),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VerifyKind::Signup => "signup",
            VerifyKind::Recovery => "recovery",
            VerifyKind::Invite => "invite",
            VerifyKind::MagicLink => "magiclink",
            VerifyKind::EmailChange => "email_change",
        }
    }
}

/// Changes to the current session, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
    UserUpdated(AuthUser),
    PasswordRecovery(Session),
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::SignedIn(_) => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::TokenRefreshed(_) => "TOKEN_REFRESHED",
            AuthEvent::UserUpdated(_) => "USER_UPDATED",
            AuthEvent::PasswordRecovery(_) => "PASSWORD_RECOVERY",
        }
    }
}

/// Expected authentication failures. None of these are faults of the app.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("email not confirmed")]
    EmailNotConfirmed,

    #[error("user already registered")]
    UserAlreadyRegistered,

    #[error("weak password: {0}")]
    WeakPassword(String),

    #[error("session expired")]
    SessionExpired,

    #[error("not signed in")]
    NotSignedIn,

    #[error("too many requests")]
    RateLimited,

    #[error("auth service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Email ou senha incorretos. Tente novamente.".into(),
            AuthError::EmailNotConfirmed => {
                "Confirme seu email antes de entrar. Verifique sua caixa de entrada.".into()
            }
            AuthError::UserAlreadyRegistered => "Este email já está cadastrado.".into(),
            AuthError::WeakPassword(_) => "A senha escolhida é muito fraca.".into(),
            AuthError::SessionExpired | AuthError::NotSignedIn => {
                "Sua sessão expirou. Entre novamente.".into()
            }
            AuthError::RateLimited => "Muitas tentativas. Aguarde alguns minutos.".into(),
            AuthError::Rejected { message, .. } => message.clone(),
            AuthError::Network(_) => {
                "Não foi possível contactar o serviço de autenticação. Tente novamente mais tarde."
                    .into()
            }
        }
    }
}

/// Operations the hosted authentication service offers.
pub trait AuthProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str, redirect_to: &str) -> Result<SignUpOutcome, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
    fn reset_password(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;
    /// The "check current session" call.
    fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
    fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError>;
    fn update_password(&self, access_token: &str, password: &str) -> Result<(), AuthError>;
    fn verify(&self, token_hash: &str, kind: VerifyKind) -> Result<Session, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_kind_accepts_email_alias() {
        assert_eq!(VerifyKind::parse("email"), Some(VerifyKind::Signup));
        assert_eq!(VerifyKind::parse("recovery"), Some(VerifyKind::Recovery));
        assert_eq!(VerifyKind::parse("bogus"), None);
    }

    #[test]
    fn rejected_shows_service_message() {
        let e = AuthError::Rejected {
            status: 403,
            message: "Token has expired".into(),
        };
        assert_eq!(e.user_message(), "Token has expired");
    }
}
