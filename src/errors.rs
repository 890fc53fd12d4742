// src/errors.rs
use crate::auth::AuthError;
use crate::backend::BackendError;

/// Errors originating from the server logic (routing, missing resources)
/// or from the hosted backend behind it.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("internal server error")]
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Auth(AuthError::Network(_)) => 502,
            ServerError::Auth(_) => 401,
            ServerError::Backend(_) => 502,
            ServerError::InternalError => 500,
        }
    }

    /// Text safe to show on an error page.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound => "Página não encontrada".into(),
            ServerError::BadRequest(msg) => msg.clone(),
            ServerError::Backend(e) => e.user_message().into(),
            ServerError::Auth(e) => e.user_message(),
            ServerError::InternalError => "Erro interno do servidor".into(),
        }
    }
}
